//! Mirror Pages CLI
//!
//! Usage:
//!   mirror-pages [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>  Site configuration (TOML), defaults to mirror-pages.toml
//!   --no-publish         Render and write the documents without publishing
//!   -h, --help           Print help

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mirror_pages::{
    publish_pages, render_pages, write_pages, ConfigError, GithubUpdater, LinkError,
    PipelineError, SiteConfig, VersionError,
};

const DEFAULT_CONFIG: &str = "mirror-pages.toml";

#[derive(Parser)]
#[command(name = "mirror-pages")]
#[command(about = "Render and publish localized download pages")]
struct Cli {
    /// Site configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after writing the rendered documents
    #[arg(long)]
    no_publish: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirror_pages=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err((err, path)) => {
            eprintln!("Error: {}", describe_config_error(&err, &path));
            return ExitCode::FAILURE;
        }
    };

    match run(&config, !cli.no_publish) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", describe_pipeline_error(&err, &config));
            ExitCode::FAILURE
        }
    }
}

/// Explicit `--config`, else `mirror-pages.toml` if present, else defaults
fn load_config(explicit: Option<&Path>) -> Result<SiteConfig, (ConfigError, PathBuf)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                tracing::debug!("no {} found, using built-in defaults", DEFAULT_CONFIG);
                return Ok(SiteConfig::default());
            }
            default
        }
    };
    SiteConfig::from_file(&path).map_err(|e| (e, path))
}

/// Point at the offending line for TOML syntax errors
fn describe_config_error(err: &ConfigError, path: &Path) -> String {
    if err.span().is_none() {
        return err.to_string();
    }
    match std::fs::read_to_string(path) {
        Ok(source) => err.report(&source, &path.display().to_string()),
        Err(_) => err.to_string(),
    }
}

fn describe_pipeline_error(err: &PipelineError, config: &SiteConfig) -> String {
    match err {
        PipelineError::Link(LinkError::Config(e)) => describe_config_error(e, &config.links),
        PipelineError::Version(VersionError::Config(e)) => {
            describe_config_error(e, &config.version_file)
        }
        other => other.to_string(),
    }
}

fn run(config: &SiteConfig, publish: bool) -> Result<(), PipelineError> {
    let pages = render_pages(config)?;
    write_pages(config, &pages)?;

    if publish {
        let updater = GithubUpdater::from_env(&config.publish.api_url, &config.publish.token_env)?;
        publish_pages(config, &pages, &updater)?;
    }
    Ok(())
}
