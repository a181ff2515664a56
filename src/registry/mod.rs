//! Link registry: per-platform, per-locale download links
//!
//! A links file is a two-level table. Section names are platforms, keys are
//! lowercase locale codes and values are raw link strings:
//!
//! ```toml
//! [provider]
//! name = "GitHub"
//!
//! [windows]
//! fa = "https://example.org/tb-fa.exe$https://example.org/tb-fa.exe.asc$c0ffee"
//!
//! [linux]
//! fa = "tb-fa-32.tar.xz$tb-fa-32.asc$aa,tb-fa-64.tar.xz$tb-fa-64.asc$bb"
//! ```
//!
//! Every platform/locale pair must be present. Loading parses every entry up
//! front, so a registry that loads successfully is complete.

mod fields;
mod types;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::error::ConfigError;

pub use fields::{
    parse_fields, parse_linux_fields, EmptyTokenPolicy, FieldError, FIELD_SEPARATOR,
    LINUX_SEPARATOR,
};
pub use types::{
    ArtifactFieldSet, ArtifactFields, Locale, Platform, PlatformVariant, UnknownName,
};

/// Errors that can occur while building or querying a registry
#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no link entry for {platform}/{locale}")]
    MissingEntry { platform: Platform, locale: Locale },

    #[error("malformed link entry for {platform}/{locale}: {source}")]
    MalformedEntry {
        platform: Platform,
        locale: Locale,
        source: FieldError,
    },
}

impl LinkError {
    pub fn missing(platform: Platform, locale: Locale) -> Self {
        Self::MissingEntry { platform, locale }
    }

    pub fn malformed(platform: Platform, locale: Locale, source: FieldError) -> Self {
        Self::MalformedEntry {
            platform,
            locale,
            source,
        }
    }
}

/// Section holding metadata about the hosting provider
const PROVIDER_SECTION: &str = "provider";

/// Parsed links for one render run
#[derive(Debug, Clone)]
pub struct LinkRegistry {
    entries: BTreeMap<(Platform, Locale), ArtifactFieldSet>,
    provider: Option<String>,
}

impl LinkRegistry {
    /// Load a links file from disk
    pub fn load(path: &Path, policy: EmptyTokenPolicy) -> Result<Self, LinkError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::parse(&content, &path.display().to_string(), policy)
    }

    /// Load a links file from a TOML string
    pub fn from_str(content: &str, policy: EmptyTokenPolicy) -> Result<Self, LinkError> {
        Self::parse(content, "<links>", policy)
    }

    fn parse(content: &str, origin: &str, policy: EmptyTokenPolicy) -> Result<Self, LinkError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::syntax(origin, e))?;

        let provider = match table.get(PROVIDER_SECTION) {
            Some(section) => section
                .get("name")
                .map(|name| {
                    name.as_str().map(str::to_string).ok_or_else(|| {
                        ConfigError::invalid(origin, "provider.name is not a string")
                    })
                })
                .transpose()?,
            None => None,
        };

        let mut entries = BTreeMap::new();
        for platform in Platform::ALL {
            for locale in Locale::ALL {
                let raw = raw_entry(&table, origin, platform, locale)?;
                let set = parse_entry(raw, platform, policy)
                    .map_err(|e| LinkError::malformed(platform, locale, e))?;
                entries.insert((platform, locale), set);
            }
        }

        debug!(
            entries = entries.len(),
            provider = provider.as_deref().unwrap_or("unknown"),
            "link registry loaded"
        );

        Ok(Self { entries, provider })
    }

    /// Resolve the entry for a platform/locale pair
    pub fn get(&self, platform: Platform, locale: Locale) -> Result<&ArtifactFieldSet, LinkError> {
        self.entries
            .get(&(platform, locale))
            .ok_or(LinkError::missing(platform, locale))
    }

    /// Fields for one render variant in one locale
    pub fn fields(
        &self,
        variant: PlatformVariant,
        locale: Locale,
    ) -> Result<&ArtifactFields, LinkError> {
        let platform = variant.platform();
        self.get(platform, locale)?
            .variant(variant)
            .ok_or(LinkError::missing(platform, locale))
    }

    /// Name from the `[provider]` section, if any
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Number of platform/locale entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn raw_entry<'a>(
    table: &'a toml::Table,
    origin: &str,
    platform: Platform,
    locale: Locale,
) -> Result<&'a str, LinkError> {
    let value = table
        .get(platform.code())
        .and_then(|section| section.get(locale.code()))
        .ok_or(LinkError::missing(platform, locale))?;

    value.as_str().ok_or_else(|| {
        ConfigError::invalid(
            origin,
            format!("{}.{} is not a string", platform, locale),
        )
        .into()
    })
}

fn parse_entry(
    raw: &str,
    platform: Platform,
    policy: EmptyTokenPolicy,
) -> Result<ArtifactFieldSet, FieldError> {
    match platform {
        Platform::Linux => {
            let (bits32, bits64) = parse_linux_fields(raw, policy)?;
            Ok(ArtifactFieldSet::Linux { bits32, bits64 })
        }
        Platform::Windows | Platform::Osx => {
            parse_fields(raw, policy).map(ArtifactFieldSet::Single)
        }
    }
}
