//! GitHub integration: repository identity, web URLs and pull requests

mod pull_request;
mod remote;

pub use pull_request::{
    DEFAULT_API_URL, GitHubClient, PullRequestApi, PullRequestOptions, PullRequestResponse,
};
pub use remote::{RepoIdentity, parse_github_url};
