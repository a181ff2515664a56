//! Error types for reading configuration files

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A configuration source that could not be used
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {origin}: {}", source.message())]
    Syntax {
        origin: String,
        source: toml::de::Error,
    },

    #[error("invalid value in {origin}: {message}")]
    Invalid { origin: String, message: String },
}

impl ConfigError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn syntax(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Syntax {
            origin: origin.into(),
            source,
        }
    }

    pub fn invalid(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Location of a syntax error, when the parser reported one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { source, .. } => source.span(),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Falls back to the plain message when there is no span to point at.
    pub fn report(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };
        let message = match self {
            Self::Syntax { source, .. } => source.message().to_string(),
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid configuration")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
