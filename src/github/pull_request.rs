//! Pull request creation through the GitHub REST API

use crate::error::{GitHubError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Body of a create-pull-request call
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestOptions {
    /// Title of the pull request
    pub title: String,
    /// Branch with the changes
    pub head: String,
    /// Branch the changes are pulled into
    pub base: String,
    /// Description
    pub body: String,
}

/// Status and payload of a create-pull-request call
#[derive(Debug, Clone)]
pub struct PullRequestResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Web URL of the created pull request, when one was created
    pub url: Option<String>,
    /// HTTP reason phrase
    pub status_text: String,
}

impl PullRequestResponse {
    /// Whether GitHub reported the pull request as created
    pub fn is_created(&self) -> bool {
        self.status_code == 201
    }
}

/// Hosting-service pull request API
pub trait PullRequestApi: Send + Sync {
    /// Open a pull request on `owner/repo`
    fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        options: &PullRequestOptions,
    ) -> impl Future<Output = Result<PullRequestResponse>> + Send;
}

#[derive(Debug, Deserialize)]
struct CreatedPullRequest {
    html_url: Option<String>,
}

/// Minimal GitHub API client
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GitHubClient {
    /// Create a client for `api_url`; requests fail with [`GitHubError::MissingToken`] without a token
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitHubError::from)?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }
}

impl PullRequestApi for GitHubClient {
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        options: &PullRequestOptions,
    ) -> Result<PullRequestResponse> {
        let token = self.token.as_deref().ok_or(GitHubError::MissingToken)?;
        let url = format!("{}/repos/{}/{}/pulls", self.api_url, owner, repo);
        log::debug!("POST {} ({} -> {})", url, options.head, options.base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(options)
            .send()
            .await
            .map_err(GitHubError::from)?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let url = if status.is_success() {
            response
                .json::<CreatedPullRequest>()
                .await
                .ok()
                .and_then(|created| created.html_url)
        } else {
            None
        };

        Ok(PullRequestResponse {
            status_code: status.as_u16(),
            url,
            status_text,
        })
    }
}
