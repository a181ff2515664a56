//! Publishing rendered documents to remote repositories
//!
//! The core only needs something that can replace the content of one file in
//! one repository. [`DocumentUpdater`] is that seam; [`GithubUpdater`] is the
//! implementation used by the CLI.

mod github;

use serde::Deserialize;
use thiserror::Error;

pub use github::GithubUpdater;

/// Errors reported by a document updater
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("environment variable {var} with the access token is not set")]
    MissingToken { var: String },

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

/// A file in a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishTarget {
    pub owner: String,
    pub repo: String,
    /// Path of the file inside the repository
    pub path: String,
    /// Branch to commit to; the repository default when absent
    #[serde(default)]
    pub branch: Option<String>,
    /// Commit message
    pub message: String,
}

impl PublishTarget {
    /// `owner/repo:path@branch`, for logs
    pub fn describe(&self) -> String {
        let mut out = format!("{}/{}:{}", self.owner, self.repo, self.path);
        if let Some(branch) = &self.branch {
            out.push('@');
            out.push_str(branch);
        }
        out
    }
}

/// Replaces the content of one remote document
pub trait DocumentUpdater {
    fn update(&self, target: &PublishTarget, content: &str) -> Result<(), PublishError>;
}
