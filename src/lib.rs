//! # Release Train
//!
//! Interactive, resumable release-branch workflow for npm projects hosted on
//! GitHub.
//!
//! A run creates (or reuses) a release branch, merges the feature and fix
//! branches the operator picks, suggests and applies the next version, pushes
//! the branch and its tags, and prints the staging pull request and
//! release-notes URLs. Progress is checkpointed to
//! `.release_train_progress.json` after every step, so an interrupted run can
//! be resumed by starting the tool again in the same directory.
//!
//! ## Usage
//!
//! ```bash
//! kodegen_release_train                       # interactive release
//! kodegen_release_train --staging-branch qa   # different staging default
//! kodegen_release_train --create-pr           # open the staging PR via the API
//! kodegen_release_train -version              # print the version
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod error;
pub mod git;
pub mod github;
pub mod state;
pub mod version;

pub use cli::Args;
pub use cli::commands::{Collaborators, Halt, ReleaseOutcome, ReleaseProcess};
pub use error::{ReleaseError, Result};
pub use git::{GitOperations, SystemGit};
pub use github::{GitHubClient, PullRequestApi, RepoIdentity};
pub use state::{ReleaseState, StateManager};
pub use version::{NpmPackage, PackageVersion};

use std::fmt;
use std::path::PathBuf;

/// Configuration for a release run
#[derive(Clone)]
pub struct ReleaseConfig {
    /// Directory holding the repository, package.json and the progress file
    pub work_dir: PathBuf,
    /// Remote to fetch from, merge from and push to
    pub remote: String,
    /// Default answer for the base-branch prompt
    pub default_base_branch: String,
    /// Default answer for the staging-branch prompt
    pub default_staging_branch: String,
    /// Open the staging pull request through the API
    pub create_pull_request: bool,
    /// Token for the GitHub API
    pub github_token: Option<String>,
    /// GitHub REST API base URL
    pub github_api_url: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            remote: "origin".to_string(),
            default_base_branch: "master".to_string(),
            default_staging_branch: "preprod".to_string(),
            create_pull_request: false,
            github_token: None,
            github_api_url: github::DEFAULT_API_URL.to_string(),
        }
    }
}

impl fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("work_dir", &self.work_dir)
            .field("remote", &self.remote)
            .field("default_base_branch", &self.default_base_branch)
            .field("default_staging_branch", &self.default_staging_branch)
            .field("create_pull_request", &self.create_pull_request)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("github_api_url", &self.github_api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_redacts_token() {
        let config = ReleaseConfig {
            github_token: Some("ghp_secret123".to_string()),
            ..ReleaseConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("ghp_secret123"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("preprod"));
    }
}
