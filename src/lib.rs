//! Mirror Pages - localized download pages for a software distribution
//!
//! Reads a registry of per-platform, per-locale download links, renders a
//! markdown readme and an HTML landing page from templates, and publishes
//! both to remote repositories.
//!
//! # Example
//!
//! ```rust
//! use mirror_pages::{render_readme, EmptyTokenPolicy, LinkRegistry, Template};
//!
//! let mut links = String::new();
//! for platform in ["windows", "osx"] {
//!     links.push_str(&format!("[{platform}]\n"));
//!     for lc in ["fa", "zh", "tr", "en"] {
//!         links.push_str(&format!("{lc} = \"{platform}-{lc}$sig$sha\"\n"));
//!     }
//! }
//! links.push_str("[linux]\n");
//! for lc in ["fa", "zh", "tr", "en"] {
//!     links.push_str(&format!("{lc} = \"l32-{lc}$sig$sha,l64-{lc}$sig$sha\"\n"));
//! }
//!
//! let registry = LinkRegistry::from_str(&links, EmptyTokenPolicy::Collapse).unwrap();
//! let template = Template::new("Tor Browser %TB_VERSION%: %WINDOWS_EN%");
//! let readme = render_readme(&template, &registry, "9.5").unwrap();
//! assert_eq!(readme, "Tor Browser 9.5: windows-en");
//! ```

pub mod config;
pub mod error;
pub mod placeholder;
pub mod publish;
pub mod registry;
pub mod renderer;
pub mod version;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use config::SiteConfig;
pub use error::ConfigError;
pub use placeholder::{Field, Placeholder, Substitutions, VERSION_KEY};
pub use publish::{DocumentUpdater, GithubUpdater, PublishError, PublishTarget};
pub use registry::{
    ArtifactFieldSet, ArtifactFields, EmptyTokenPolicy, LinkError, LinkRegistry, Locale,
    Platform, PlatformVariant,
};
pub use renderer::{
    render, render_landing_page, render_readme, RenderError, RenderOptions, Template,
};
pub use version::VersionError;

/// Errors that can occur during a render/publish run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Both documents of one run, fully rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPages {
    pub version: String,
    pub readme: String,
    pub landing_page: String,
}

/// Load every input and render both documents in memory
///
/// Nothing is written here: a missing entry or template aborts the run
/// before any output exists.
pub fn render_pages(config: &SiteConfig) -> Result<RenderedPages, PipelineError> {
    let version = version::load_version(&config.version_file)?;
    let registry = LinkRegistry::load(&config.links, config.links_format.empty_tokens)?;
    if let Some(provider) = registry.provider() {
        info!(provider, links = %config.links.display(), "links loaded");
    }

    let readme_template = Template::from_file(&config.readme.template)?;
    let landing_template = Template::from_file(&config.landing_page.template)?;

    let landing_page = render_landing_page(&landing_template, &registry, &version)?;
    info!(%version, "landing page rendered");
    let readme = render_readme(&readme_template, &registry, &version)?;
    info!(%version, "readme rendered");

    Ok(RenderedPages {
        version,
        readme,
        landing_page,
    })
}

/// Write both rendered documents to their configured outputs
///
/// Both documents are first written next to their outputs with a `.tmp`
/// suffix and only renamed into place once both writes succeeded, so a
/// failed write leaves the previous outputs untouched. A failure of the
/// final rename itself can still leave one document updated.
pub fn write_pages(config: &SiteConfig, pages: &RenderedPages) -> Result<(), PipelineError> {
    let mut staged = Vec::new();
    for (path, content) in [
        (&config.landing_page.output, &pages.landing_page),
        (&config.readme.output, &pages.readme),
    ] {
        match stage_output(path, content) {
            Ok(tmp) => staged.push((tmp, path)),
            Err(err) => {
                for (tmp, _) in &staged {
                    let _ = std::fs::remove_file(tmp);
                }
                return Err(err);
            }
        }
    }

    for (tmp, path) in staged {
        std::fs::rename(&tmp, path).map_err(|source| write_error(path, source))?;
        info!(path = %path.display(), "document written");
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn stage_output(path: &Path, content: &str) -> Result<PathBuf, PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| write_error(path, source))?;
    }
    let tmp = staging_path(path);
    std::fs::write(&tmp, content).map_err(|source| write_error(path, source))?;
    Ok(tmp)
}

fn write_error(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Push the landing page, then the readme, stopping at the first failure
pub fn publish_pages(
    config: &SiteConfig,
    pages: &RenderedPages,
    updater: &dyn DocumentUpdater,
) -> Result<(), PipelineError> {
    for (target, content) in [
        (&config.publish.landing_page, &pages.landing_page),
        (&config.publish.readme, &pages.readme),
    ] {
        updater.update(target, content)?;
        info!(document = %target.describe(), "published");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display() {
        let err = PipelineError::Write {
            path: PathBuf::from("upload/readme_gh.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot write upload/readme_gh.md: denied");
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("upload/readme_gh.md")),
            PathBuf::from("upload/readme_gh.md.tmp")
        );
    }

    #[test]
    fn test_missing_version_file_aborts() {
        let config = SiteConfig {
            version_file: PathBuf::from("/nonexistent/latest_torbrowser.cfg"),
            ..SiteConfig::default()
        };
        let err = render_pages(&config).unwrap_err();
        assert!(matches!(err, PipelineError::Version(_)));
    }
}
