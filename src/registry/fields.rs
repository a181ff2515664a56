//! Parsing of raw link strings into artifact fields
//!
//! A raw entry looks like `package$signature$checksum`. Linux entries hold
//! two of those separated by a comma, 32-bit first.

use serde::Deserialize;
use thiserror::Error;

use super::types::ArtifactFields;

/// Separator between the fields of one package
pub const FIELD_SEPARATOR: char = '$';

/// Separator between the 32-bit and 64-bit halves of a linux entry
pub const LINUX_SEPARATOR: char = ',';

/// Most fields a single package entry can carry
const MAX_FIELDS: usize = 3;

/// Shape errors in a raw link string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("expected at most 3 fields, found {count}")]
    TooManyFields { count: usize },

    #[error("package link is empty")]
    EmptyPackage,

    #[error("expected exactly 2 comma-separated halves, found {count}")]
    LinuxHalves { count: usize },
}

/// How empty `$` segments are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTokenPolicy {
    /// Drop empty segments and assign the rest positionally.
    ///
    /// `pkg$$sha` becomes package `pkg` and signature `sha`: the checksum
    /// shifts into the signature slot. Existing links files rely on this.
    #[default]
    Collapse,
    /// Keep every segment in its slot; empty segments become `None`
    Preserve,
}

/// Split a raw entry into `(package, signature, checksum)`
pub fn parse_fields(raw: &str, policy: EmptyTokenPolicy) -> Result<ArtifactFields, FieldError> {
    let segments = raw.split(FIELD_SEPARATOR);

    let slots: Vec<Option<String>> = match policy {
        EmptyTokenPolicy::Collapse => segments
            .filter(|s| !s.is_empty())
            .map(|s| Some(s.to_string()))
            .collect(),
        EmptyTokenPolicy::Preserve => segments
            .map(|s| (!s.is_empty()).then(|| s.to_string()))
            .collect(),
    };

    if slots.len() > MAX_FIELDS {
        return Err(FieldError::TooManyFields { count: slots.len() });
    }

    let mut slots = slots.into_iter();
    let package = slots.next().flatten().ok_or(FieldError::EmptyPackage)?;
    let signature = slots.next().flatten();
    let checksum = slots.next().flatten();

    Ok(ArtifactFields {
        package,
        signature,
        checksum,
    })
}

/// Split a linux entry into its 32-bit and 64-bit field tuples
///
/// Leading whitespace after the comma is ignored; fields are otherwise
/// kept byte for byte.
pub fn parse_linux_fields(
    raw: &str,
    policy: EmptyTokenPolicy,
) -> Result<(ArtifactFields, ArtifactFields), FieldError> {
    let halves: Vec<&str> = raw.split(LINUX_SEPARATOR).collect();
    match halves.as_slice() {
        [bits32, bits64] => Ok((
            parse_fields(bits32, policy)?,
            parse_fields(bits64.trim_start(), policy)?,
        )),
        _ => Err(FieldError::LinuxHalves {
            count: halves.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pkg: &str, sig: Option<&str>, sha: Option<&str>) -> ArtifactFields {
        ArtifactFields::new(pkg, sig.map(String::from), sha.map(String::from))
    }

    #[test]
    fn test_full_entry() {
        let parsed = parse_fields("pkgA$sigA$shaA", EmptyTokenPolicy::Collapse).unwrap();
        assert_eq!(parsed, fields("pkgA", Some("sigA"), Some("shaA")));
    }

    #[test]
    fn test_collapse_shifts_checksum_into_signature() {
        let parsed = parse_fields("pkgA$$shaA", EmptyTokenPolicy::Collapse).unwrap();
        assert_eq!(parsed, fields("pkgA", Some("shaA"), None));
    }

    #[test]
    fn test_preserve_keeps_slots() {
        let parsed = parse_fields("pkgA$$shaA", EmptyTokenPolicy::Preserve).unwrap();
        assert_eq!(parsed, fields("pkgA", None, Some("shaA")));
    }

    #[test]
    fn test_collapse_ignores_leading_and_trailing_separators() {
        let parsed = parse_fields("$pkgA$sigA$shaA$", EmptyTokenPolicy::Collapse).unwrap();
        assert_eq!(parsed, fields("pkgA", Some("sigA"), Some("shaA")));
    }

    #[test]
    fn test_whitespace_token_is_a_value() {
        let parsed = parse_fields("pkg$ $sha", EmptyTokenPolicy::Collapse).unwrap();
        assert_eq!(parsed, fields("pkg", Some(" "), Some("sha")));

        let parsed = parse_fields(" pkg $sig", EmptyTokenPolicy::Preserve).unwrap();
        assert_eq!(parsed, fields(" pkg ", Some("sig"), None));
    }

    #[test]
    fn test_package_only() {
        let parsed = parse_fields("pkgA", EmptyTokenPolicy::Collapse).unwrap();
        assert_eq!(parsed, fields("pkgA", None, None));
    }

    #[test]
    fn test_too_many_fields_is_rejected() {
        let err = parse_fields("a$b$c$d", EmptyTokenPolicy::Collapse).unwrap_err();
        assert_eq!(err, FieldError::TooManyFields { count: 4 });

        let err = parse_fields("a$b$c$", EmptyTokenPolicy::Preserve).unwrap_err();
        assert_eq!(err, FieldError::TooManyFields { count: 4 });
    }

    #[test]
    fn test_empty_package_is_rejected() {
        assert_eq!(
            parse_fields("", EmptyTokenPolicy::Collapse),
            Err(FieldError::EmptyPackage)
        );
        assert_eq!(
            parse_fields("$sig$sha", EmptyTokenPolicy::Preserve),
            Err(FieldError::EmptyPackage)
        );
    }

    #[test]
    fn test_linux_pair() {
        let (bits32, bits64) =
            parse_linux_fields("pkgA$sigA$shaA,pkgB$sigB$shaB", EmptyTokenPolicy::Collapse)
                .unwrap();
        assert_eq!(bits32, fields("pkgA", Some("sigA"), Some("shaA")));
        assert_eq!(bits64, fields("pkgB", Some("sigB"), Some("shaB")));
    }

    #[test]
    fn test_linux_64_bit_half_ignores_leading_space() {
        let (_, bits64) =
            parse_linux_fields("pkgA$sigA$shaA, pkgB$sigB$shaB", EmptyTokenPolicy::Collapse)
                .unwrap();
        assert_eq!(bits64.package, "pkgB");
    }

    #[test]
    fn test_linux_wrong_half_count() {
        assert_eq!(
            parse_linux_fields("pkgA$sigA$shaA", EmptyTokenPolicy::Collapse),
            Err(FieldError::LinuxHalves { count: 1 })
        );
        assert_eq!(
            parse_linux_fields("a,b,c", EmptyTokenPolicy::Collapse),
            Err(FieldError::LinuxHalves { count: 3 })
        );
    }
}
