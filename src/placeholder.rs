//! Placeholder keys and their replacement values
//!
//! Templates mark download links with literal tokens such as `%WINDOWS_FA%`
//! (package link) and `%LINUX64_ZH_SIG%` (signature link). Every token is a
//! combination of a [`PlatformVariant`], a [`Locale`] and a [`Field`], so the
//! full set is enumerable:
//!
//! | field     | key                         |
//! |-----------|-----------------------------|
//! | package   | `%<VARIANT>_<LOCALE>%`      |
//! | signature | `%<VARIANT>_<LOCALE>_SIG%`  |
//! | checksum  | `%<VARIANT>_<LOCALE>_SHA%`  |
//!
//! The version token [`VERSION_KEY`] is independent of locale and platform
//! and is always replaced last.

use std::fmt;

use tracing::{debug, warn};

use crate::registry::{LinkError, LinkRegistry, Locale, PlatformVariant};

/// Token replaced with the distributed software version
pub const VERSION_KEY: &str = "%TB_VERSION%";

/// Which of an artifact's strings a placeholder stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Package,
    Signature,
    Checksum,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Package, Field::Signature, Field::Checksum];

    fn suffix(self) -> &'static str {
        match self {
            Field::Package => "",
            Field::Signature => "_SIG",
            Field::Checksum => "_SHA",
        }
    }
}

/// One template token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub variant: PlatformVariant,
    pub locale: Locale,
    pub field: Field,
}

impl Placeholder {
    pub fn new(variant: PlatformVariant, locale: Locale, field: Field) -> Self {
        Self {
            variant,
            locale,
            field,
        }
    }

    /// The literal text this placeholder appears as in templates
    pub fn key(&self) -> String {
        format!(
            "%{}_{}{}%",
            self.variant.code(),
            self.locale.placeholder_code(),
            self.field.suffix()
        )
    }

    /// Every placeholder, locale-major, in substitution order
    pub fn all() -> impl Iterator<Item = Placeholder> {
        Locale::ALL.into_iter().flat_map(|locale| {
            PlatformVariant::ALL.into_iter().flat_map(move |variant| {
                Field::ALL
                    .into_iter()
                    .map(move |field| Placeholder::new(variant, locale, field))
            })
        })
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Replacement values for every placeholder, plus the version
#[derive(Debug, Clone)]
pub struct Substitutions {
    entries: Vec<(Placeholder, String)>,
    version: String,
}

impl Substitutions {
    /// Resolve every placeholder against a registry
    pub fn compute(registry: &LinkRegistry, version: impl Into<String>) -> Result<Self, LinkError> {
        let mut entries = Vec::new();
        for placeholder in Placeholder::all() {
            let fields = registry.fields(placeholder.variant, placeholder.locale)?;
            let value = match placeholder.field {
                Field::Package => Some(fields.package.as_str()),
                Field::Signature => fields.signature.as_deref(),
                Field::Checksum => fields.checksum.as_deref(),
            };
            if value.is_none() && placeholder.field == Field::Signature {
                warn!(placeholder = %placeholder, "no signature link, substituting empty text");
            }
            entries.push((placeholder, value.unwrap_or_default().to_string()));
        }

        debug!(placeholders = entries.len(), "substitutions computed");

        Ok(Self {
            entries,
            version: version.into(),
        })
    }

    /// Value for one placeholder
    pub fn value(&self, placeholder: &Placeholder) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == placeholder)
            .map(|(_, v)| v.as_str())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// All (placeholder, value) pairs in substitution order
    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &str)> {
        self.entries.iter().map(|(p, v)| (p, v.as_str()))
    }

    /// Replace the placeholders whose field is in `fields`, then the version
    ///
    /// Replacement is literal. Keys absent from `text` are skipped.
    pub fn apply(&self, text: &str, fields: &[Field]) -> String {
        let mut out = text.to_string();
        for (placeholder, value) in &self.entries {
            if !fields.contains(&placeholder.field) {
                continue;
            }
            let key = placeholder.key();
            if out.contains(&key) {
                out = out.replace(&key, value);
            }
        }
        out.replace(VERSION_KEY, &self.version)
    }
}
