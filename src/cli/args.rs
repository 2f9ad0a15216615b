//! Command line argument parsing.
//!
//! The tool is interactive, so the flags only tune defaults and opt into the
//! GitHub API. The version flag is handled before clap runs because it accepts
//! the single-dash spellings `-v` and `-version` as well.

use crate::ReleaseConfig;
use crate::github::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;

/// Spellings that print the tool version and exit
pub const VERSION_FLAGS: [&str; 4] = ["-v", "--v", "-version", "--version"];

/// Interactive release-branch workflow
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_release_train",
    about = "Build a release branch, merge feature/fix branches, tag, push and open the staging PR",
    long_about = "Build a release branch interactively.

Creates (or reuses) a release branch, merges the branches you pick, suggests and
applies the next version, pushes branch and tags, and prints the staging pull
request and release-notes URLs. Progress is saved to .release_train_progress.json
so an interrupted run can be resumed by running the tool again.",
    disable_version_flag = true
)]
pub struct Args {
    /// Remote to fetch from, merge from and push to
    #[arg(long, env = "RELEASE_TRAIN_REMOTE", default_value = "origin")]
    pub remote: String,

    /// Default answer for the base-branch prompt
    #[arg(long, env = "RELEASE_TRAIN_BASE_BRANCH", default_value = "master")]
    pub base_branch: String,

    /// Default answer for the staging-branch prompt
    #[arg(long, env = "RELEASE_TRAIN_STAGING_BRANCH", default_value = "preprod")]
    pub staging_branch: String,

    /// Open the staging pull request through the GitHub API instead of only printing its URL
    #[arg(long, env = "RELEASE_TRAIN_CREATE_PR")]
    pub create_pr: bool,

    /// GitHub token used with --create-pr (falls back to GH_TOKEN)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub REST API base URL (pull requests only; web URLs always use github.com)
    #[arg(long, env = "RELEASE_TRAIN_GITHUB_API", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.remote.trim().is_empty() {
            return Err("--remote must not be empty".to_string());
        }
        if self.create_pr && self.token().is_none() {
            return Err(
                "--create-pr needs a token: set GITHUB_TOKEN or GH_TOKEN, or pass --github-token"
                    .to_string(),
            );
        }
        Ok(())
    }

    /// Token from the flag, GITHUB_TOKEN or GH_TOKEN
    pub fn token(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| std::env::var("GH_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }

    /// Build the release configuration for `work_dir`
    pub fn release_config(&self, work_dir: PathBuf) -> ReleaseConfig {
        ReleaseConfig {
            work_dir,
            remote: self.remote.clone(),
            default_base_branch: self.base_branch.clone(),
            default_staging_branch: self.staging_branch.clone(),
            create_pull_request: self.create_pr,
            github_token: self.token(),
            github_api_url: self.github_api_url.clone(),
        }
    }
}

/// Whether the raw arguments (program name first) ask for the version
pub fn is_version_request<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .skip(1)
        .any(|arg| VERSION_FLAGS.contains(&arg.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_flag_spellings() {
        for flag in VERSION_FLAGS {
            assert!(is_version_request(&["kodegen_release_train", flag]), "{flag}");
        }
        assert!(!is_version_request(&["kodegen_release_train"]));
        assert!(!is_version_request(&["kodegen_release_train", "--verbose"]));
        assert!(!is_version_request(&["-v"]));
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["kodegen_release_train", "--remote", "upstream"]);
        assert_eq!(args.remote, "upstream");
        assert_eq!(args.base_branch, "master");
        assert_eq!(args.staging_branch, "preprod");
        assert!(!args.create_pr);
    }

    #[test]
    fn test_release_config_from_args() {
        let args = Args::parse_from([
            "kodegen_release_train",
            "--staging-branch",
            "staging",
            "--github-token",
            "t0k3n",
            "--create-pr",
        ]);
        assert!(args.validate().is_ok());

        let config = args.release_config(PathBuf::from("/repo"));
        assert_eq!(config.default_staging_branch, "staging");
        assert!(config.create_pull_request);
        assert_eq!(config.github_token.as_deref(), Some("t0k3n"));
    }
}
