//! Configuration for document rendering

use crate::placeholder::Field;

/// Options that distinguish one output format from another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Remove line breaks from the template before substitution
    pub strip_newlines: bool,

    /// Substitute `_SIG` placeholders as well as package links
    pub include_signatures: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::readme()
    }
}

impl RenderOptions {
    /// Markdown readme: newlines kept, signature links substituted
    pub fn readme() -> Self {
        Self {
            strip_newlines: false,
            include_signatures: true,
        }
    }

    /// HTML landing page: a single line, package links only
    pub fn landing_page() -> Self {
        Self {
            strip_newlines: true,
            include_signatures: false,
        }
    }

    /// Set whether newlines are stripped
    pub fn with_strip_newlines(mut self, strip: bool) -> Self {
        self.strip_newlines = strip;
        self
    }

    /// Set whether signature placeholders are substituted
    pub fn with_signatures(mut self, include: bool) -> Self {
        self.include_signatures = include;
        self
    }

    /// Fields whose placeholders get replaced. Checksums never do.
    pub fn fields(&self) -> &'static [Field] {
        if self.include_signatures {
            &[Field::Package, Field::Signature]
        } else {
            &[Field::Package]
        }
    }
}
