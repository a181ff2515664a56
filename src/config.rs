//! Site configuration
//!
//! Where links, templates and outputs live, and where rendered documents are
//! published. Every field has a default matching the historic layout, so an
//! empty file (or no file at all) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::publish::PublishTarget;
use crate::registry::EmptyTokenPolicy;

/// Top-level configuration for one render/publish run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Links file read into the registry
    pub links: PathBuf,
    /// TOML file holding `[version] current`
    pub version_file: PathBuf,
    pub links_format: LinksFormat,
    pub readme: DocumentPaths,
    pub landing_page: DocumentPaths,
    pub publish: PublishConfig,
}

/// How raw link strings are parsed
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksFormat {
    pub empty_tokens: EmptyTokenPolicy,
}

/// Template and output location of one document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentPaths {
    pub template: PathBuf,
    pub output: PathBuf,
}

/// Remote targets and credentials
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Environment variable holding the access token
    pub token_env: String,
    pub api_url: String,
    pub readme: PublishTarget,
    pub landing_page: PublishTarget,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            links: PathBuf::from("providers/github.links"),
            version_file: PathBuf::from("latest_torbrowser.cfg"),
            links_format: LinksFormat::default(),
            readme: DocumentPaths {
                template: PathBuf::from("upload/readme_gh.tpl"),
                output: PathBuf::from("upload/readme_gh.md"),
            },
            landing_page: DocumentPaths {
                template: PathBuf::from("upload/landing_gh.tpl"),
                output: PathBuf::from("upload/landing_gh.html"),
            },
            publish: PublishConfig::default(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            token_env: "GITHUB_TOKEN".to_string(),
            api_url: "https://api.github.com".to_string(),
            readme: PublishTarget {
                owner: "thetorproject".to_string(),
                repo: "gettorbrowser".to_string(),
                path: "README.md".to_string(),
                branch: None,
                message: "Updating README.".to_string(),
            },
            landing_page: PublishTarget {
                owner: "thetorproject".to_string(),
                repo: "gettor".to_string(),
                path: "index.html".to_string(),
                branch: Some("gh-pages".to_string()),
                message: "Updating landing page.".to_string(),
            },
        }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        let config = Self::parse(&content, &path.display().to_string())?;
        Ok(match path.parent() {
            Some(base) => config.relative_to(base),
            None => config,
        })
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<config>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::syntax(origin, e))
    }

    /// Resolve relative file paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in [
            &mut self.links,
            &mut self.version_file,
            &mut self.readme.template,
            &mut self.readme.output,
            &mut self.landing_page.template,
            &mut self.landing_page.output,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
