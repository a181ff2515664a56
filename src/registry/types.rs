//! Core types for the link registry

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Locales the distribution publishes pages for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Locale {
    Fa,
    Zh,
    Tr,
    En,
}

impl Locale {
    /// All locales, in substitution order
    pub const ALL: [Locale; 4] = [Locale::Fa, Locale::Zh, Locale::Tr, Locale::En];

    /// Lowercase code used as a key in links files
    pub fn code(self) -> &'static str {
        match self {
            Locale::Fa => "fa",
            Locale::Zh => "zh",
            Locale::Tr => "tr",
            Locale::En => "en",
        }
    }

    /// Uppercase code used inside placeholder keys
    pub fn placeholder_code(self) -> &'static str {
        match self {
            Locale::Fa => "FA",
            Locale::Zh => "ZH",
            Locale::Tr => "TR",
            Locale::En => "EN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an unrecognized platform or locale spelling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Locale {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|lc| lc.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName {
                kind: "locale",
                value: s.to_string(),
            })
    }
}

/// Operating system a package is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Windows,
    Osx,
    /// Carries separate 32-bit and 64-bit packages
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Osx, Platform::Linux];

    /// Section name in links files
    pub fn code(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Osx => "osx",
            Platform::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Platform {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| UnknownName {
                kind: "platform",
                value: s.to_string(),
            })
    }
}

/// A renderable download target; linux expands into two variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlatformVariant {
    Windows,
    Osx,
    Linux32,
    Linux64,
}

impl PlatformVariant {
    pub const ALL: [PlatformVariant; 4] = [
        PlatformVariant::Windows,
        PlatformVariant::Osx,
        PlatformVariant::Linux32,
        PlatformVariant::Linux64,
    ];

    /// Name used inside placeholder keys
    pub fn code(self) -> &'static str {
        match self {
            PlatformVariant::Windows => "WINDOWS",
            PlatformVariant::Osx => "OSX",
            PlatformVariant::Linux32 => "LINUX32",
            PlatformVariant::Linux64 => "LINUX64",
        }
    }

    /// The links file section this variant is read from
    pub fn platform(self) -> Platform {
        match self {
            PlatformVariant::Windows => Platform::Windows,
            PlatformVariant::Osx => Platform::Osx,
            PlatformVariant::Linux32 | PlatformVariant::Linux64 => Platform::Linux,
        }
    }
}

impl fmt::Display for PlatformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The three opaque strings published for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFields {
    /// Download link of the package itself
    pub package: String,
    /// Link to the detached signature
    pub signature: Option<String>,
    /// Checksum of the package
    pub checksum: Option<String>,
}

impl ArtifactFields {
    pub fn new(
        package: impl Into<String>,
        signature: Option<String>,
        checksum: Option<String>,
    ) -> Self {
        Self {
            package: package.into(),
            signature,
            checksum,
        }
    }
}

/// Parsed entry for one (platform, locale) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactFieldSet {
    Single(ArtifactFields),
    Linux {
        bits32: ArtifactFields,
        bits64: ArtifactFields,
    },
}

impl ArtifactFieldSet {
    /// Fields for a render variant, if this entry carries it
    pub fn variant(&self, variant: PlatformVariant) -> Option<&ArtifactFields> {
        match (self, variant) {
            (ArtifactFieldSet::Single(fields), PlatformVariant::Windows | PlatformVariant::Osx) => {
                Some(fields)
            }
            (ArtifactFieldSet::Linux { bits32, .. }, PlatformVariant::Linux32) => Some(bits32),
            (ArtifactFieldSet::Linux { bits64, .. }, PlatformVariant::Linux64) => Some(bits64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse_is_case_insensitive() {
        assert_eq!("fa".parse::<Locale>(), Ok(Locale::Fa));
        assert_eq!("ZH".parse::<Locale>(), Ok(Locale::Zh));
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("linux".parse::<Platform>(), Ok(Platform::Linux));
        let err = "beos".parse::<Platform>().unwrap_err();
        assert_eq!(err.to_string(), "unknown platform 'beos'");
    }

    #[test]
    fn test_variant_platforms() {
        assert_eq!(PlatformVariant::Linux32.platform(), Platform::Linux);
        assert_eq!(PlatformVariant::Linux64.platform(), Platform::Linux);
        assert_eq!(PlatformVariant::Osx.platform(), Platform::Osx);
    }

    #[test]
    fn test_field_set_variant_lookup() {
        let a = ArtifactFields::new("a", None, None);
        let b = ArtifactFields::new("b", None, None);
        let linux = ArtifactFieldSet::Linux {
            bits32: a.clone(),
            bits64: b.clone(),
        };
        assert_eq!(linux.variant(PlatformVariant::Linux32), Some(&a));
        assert_eq!(linux.variant(PlatformVariant::Linux64), Some(&b));
        assert_eq!(linux.variant(PlatformVariant::Windows), None);

        let single = ArtifactFieldSet::Single(a.clone());
        assert_eq!(single.variant(PlatformVariant::Osx), Some(&a));
        assert_eq!(single.variant(PlatformVariant::Linux64), None);
    }
}
