//! Repository identity and GitHub web URLs.

use crate::error::{GitHubError, Result};
use crate::git::branches::format_tag;

/// Owner and repository name on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoIdentity {
    /// Create an identity from owner and repo
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Web URL of the repository
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    /// URL that opens a pull request from `head` into `base`
    pub fn compare_url(&self, base: &str, head: &str) -> String {
        format!("{}/compare/{}...{}?expand=1", self.html_url(), base, head)
    }

    /// URL of the "draft a new release" page for `version`
    pub fn new_release_url(&self, version: &str) -> String {
        format!("{}/releases/new?tag={}", self.html_url(), format_tag(version))
    }
}

/// Parse GitHub owner/repo from a git remote URL
///
/// Supports:
/// - SCP-like: `git@github.com:owner/repo.git`
/// - HTTPS: `https://github.com/owner/repo.git`
/// - SSH: `ssh://git@github.com/owner/repo.git`
///
/// Only github.com remotes are accepted; the web URLs built from the identity
/// always point at github.com.
pub fn parse_github_url(url: &str) -> Result<RepoIdentity> {
    let url = url.trim();
    let unparsable = || GitHubError::UnparsableRemote {
        url: url.to_string(),
    };

    let path = if url.contains("://") {
        let parsed = url::Url::parse(url).map_err(|_| unparsable())?;
        if parsed.host_str() != Some("github.com") {
            return Err(unparsable().into());
        }
        parsed.path().to_string()
    } else {
        let (user_host, path) = url.split_once(':').ok_or_else(unparsable)?;
        let host = user_host.rsplit('@').next().unwrap_or(user_host);
        if host != "github.com" {
            return Err(unparsable().into());
        }
        path.to_string()
    };

    let mut parts = path
        .trim_matches('/')
        .trim_end_matches(".git")
        .split('/')
        .filter(|p| !p.is_empty());

    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) => Ok(RepoIdentity::new(owner, repo)),
        _ => Err(unparsable().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scp_remote() {
        let id = parse_github_url("git@github.com:acme/shop.git").unwrap();
        assert_eq!(id, RepoIdentity::new("acme", "shop"));
    }

    #[test]
    fn test_parse_https_remote() {
        let id = parse_github_url("https://github.com/acme/shop.git\n").unwrap();
        assert_eq!(id, RepoIdentity::new("acme", "shop"));
        let id = parse_github_url("https://github.com/acme/shop").unwrap();
        assert_eq!(id, RepoIdentity::new("acme", "shop"));
    }

    #[test]
    fn test_parse_ssh_remote() {
        let id = parse_github_url("ssh://git@github.com/acme/shop.git").unwrap();
        assert_eq!(id, RepoIdentity::new("acme", "shop"));
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert!(parse_github_url("https://gitlab.com/acme/shop.git").is_err());
        assert!(parse_github_url("/srv/git/shop.git").is_err());
    }

    #[test]
    fn test_rejects_lookalike_scp_host() {
        assert!(parse_github_url("git@evilgithub.com:acme/shop.git").is_err());
        assert!(parse_github_url("git@github.com.evil.io:acme/shop.git").is_err());
        assert!(parse_github_url("github.com:acme/shop.git").is_ok());
    }

    #[test]
    fn test_urls() {
        let id = RepoIdentity::new("acme", "shop");
        assert_eq!(
            id.new_release_url("1.4.0"),
            "https://github.com/acme/shop/releases/new?tag=v1.4.0"
        );
        assert_eq!(
            id.compare_url("preprod", "release/1.4"),
            "https://github.com/acme/shop/compare/preprod...release/1.4?expand=1"
        );
    }
}
