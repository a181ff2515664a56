//! Document renderer
//!
//! Turns a template plus a link registry into a publishable document. The
//! readme and the landing page share one code path and differ only in their
//! [`RenderOptions`].

pub mod config;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::placeholder::Substitutions;
use crate::registry::{LinkError, LinkRegistry};

pub use config::RenderOptions;

/// Errors that can occur while rendering a document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Raw template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a template file verbatim
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        std::fs::read_to_string(path)
            .map(Self::new)
            .map_err(|source| RenderError::TemplateRead {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Render a template with the given options
pub fn render(
    template: &Template,
    registry: &LinkRegistry,
    version: &str,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let substitutions = Substitutions::compute(registry, version)?;

    let text = if options.strip_newlines {
        strip_newlines(template.text())
    } else {
        template.text().to_string()
    };

    let out = substitutions.apply(&text, options.fields());
    debug!(
        bytes = out.len(),
        signatures = options.include_signatures,
        "document rendered"
    );
    Ok(out)
}

/// Render the markdown readme: newlines kept, signature links included
pub fn render_readme(
    template: &Template,
    registry: &LinkRegistry,
    version: &str,
) -> Result<String, RenderError> {
    render(template, registry, version, &RenderOptions::readme())
}

/// Render the HTML landing page as a single line, package links only
pub fn render_landing_page(
    template: &Template,
    registry: &LinkRegistry,
    version: &str,
) -> Result<String, RenderError> {
    render(template, registry, version, &RenderOptions::landing_page())
}

fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
