//! GitHub contents API updater

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{DocumentUpdater, PublishError, PublishTarget};

const USER_AGENT: &str = concat!("mirror-pages/", env!("CARGO_PKG_VERSION"));

/// Updates files through `PUT /repos/{owner}/{repo}/contents/{path}`
pub struct GithubUpdater {
    client: Client,
    api_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ExistingFile {
    sha: String,
}

#[derive(Serialize)]
struct ContentUpdate<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

impl GithubUpdater {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, PublishError> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| PublishError::Http {
                url: api_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            api_url,
            token: token.into(),
        })
    }

    /// Build an updater with the token taken from environment variable `var`
    pub fn from_env(api_url: impl Into<String>, var: &str) -> Result<Self, PublishError> {
        let token = std::env::var(var).map_err(|_| PublishError::MissingToken {
            var: var.to_string(),
        })?;
        Self::new(api_url, token)
    }

    fn contents_url(&self, target: &PublishTarget) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            target.owner,
            target.repo,
            target.path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
    }

    /// Blob sha of the current file, `None` when it does not exist yet
    fn current_sha(&self, url: &str, target: &PublishTarget) -> Result<Option<String>, PublishError> {
        let mut request = self.authorized(self.client.get(url));
        if let Some(branch) = &target.branch {
            request = request.query(&[("ref", branch)]);
        }
        let response = request.send().map_err(|source| http_error(url, source))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(url, "remote file does not exist yet");
            return Ok(None);
        }
        let response = check_status(url, response)?;
        let existing: ExistingFile = response.json().map_err(|source| http_error(url, source))?;
        Ok(Some(existing.sha))
    }
}

impl DocumentUpdater for GithubUpdater {
    fn update(&self, target: &PublishTarget, content: &str) -> Result<(), PublishError> {
        let url = self.contents_url(target);
        let sha = self.current_sha(&url, target)?;
        let body = content_update(target, content, sha);

        let response = self
            .authorized(self.client.put(&url))
            .json(&body)
            .send()
            .map_err(|source| http_error(&url, source))?;
        check_status(&url, response)?;

        info!(document = %target.describe(), "remote document updated");
        Ok(())
    }
}

fn content_update<'a>(
    target: &'a PublishTarget,
    content: &str,
    sha: Option<String>,
) -> ContentUpdate<'a> {
    ContentUpdate {
        message: &target.message,
        content: STANDARD.encode(content),
        sha,
        branch: target.branch.as_deref(),
    }
}

fn http_error(url: &str, source: reqwest::Error) -> PublishError {
    PublishError::Http {
        url: url.to_string(),
        source,
    }
}

fn check_status(
    url: &str,
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(PublishError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(branch: Option<&str>) -> PublishTarget {
        PublishTarget {
            owner: "thetorproject".to_string(),
            repo: "gettor".to_string(),
            path: "index.html".to_string(),
            branch: branch.map(String::from),
            message: "Updating landing page.".to_string(),
        }
    }

    #[test]
    fn test_contents_url() {
        let updater = GithubUpdater::new("https://api.github.com/", "token").unwrap();
        assert_eq!(
            updater.contents_url(&target(None)),
            "https://api.github.com/repos/thetorproject/gettor/contents/index.html"
        );
    }

    #[test]
    fn test_update_body_for_existing_file() {
        let target = target(Some("gh-pages"));
        let body = content_update(&target, "<p>hi</p>", Some("abc".into()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Updating landing page.",
                "content": "PHA+aGk8L3A+",
                "sha": "abc",
                "branch": "gh-pages",
            })
        );
    }

    #[test]
    fn test_update_body_for_new_file_omits_sha_and_branch() {
        let target = target(None);
        let body = content_update(&target, "", None);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Updating landing page.",
                "content": "",
            })
        );
    }

    #[test]
    fn test_missing_token_variable() {
        let result = GithubUpdater::from_env(
            "https://api.github.com",
            "MIRROR_PAGES_TEST_TOKEN_THAT_IS_NEVER_SET",
        );
        assert!(matches!(result, Err(PublishError::MissingToken { .. })));
    }
}
