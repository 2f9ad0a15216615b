//! Error types for release train operations.
//!
//! Every collaborator call (git, npm, GitHub, prompts) returns [`Result`], so a
//! step outcome is always either a value or exactly one error.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release train operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release train operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Version management errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// State management errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// CLI and prompt errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// GitHub operation errors
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Version management errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// No version was entered at the version prompt
    #[error("🚫  You must select the next release version.")]
    NotSelected,

    /// `npm version` failed
    #[error("🚫  Unable to set the next NPM Version: {reason}")]
    SetFailed {
        /// Reason for the error
        reason: String,
    },

    /// package.json could not be read
    #[error("Failed to read package manifest at {path}: {reason}")]
    ManifestUnreadable {
        /// Path to package.json
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Not inside a git work tree
    #[error("🚫  Sorry! This CLI should be run on a git instantiated directory.")]
    NotRepository,

    /// git binary could not be located
    #[error("git executable not found on PATH: {reason}")]
    GitNotFound {
        /// Reason for the error
        reason: String,
    },

    /// No branch name given for the release branch
    #[error("Must provide a branch name!")]
    BranchNameRequired,

    /// A git command exited unsuccessfully
    #[error("`{command}` failed: {reason}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Reason for the error (stderr)
        reason: String,
    },

    /// Merge of a selected branch failed
    #[error("Failed to merge '{branch}': {reason}")]
    MergeFailed {
        /// Branch being merged
        branch: String,
        /// Reason for the error
        reason: String,
    },

    /// Push failed
    #[error("Git push failed: {reason}")]
    PushFailed {
        /// Reason for the error
        reason: String,
    },
}

/// State management errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to save state
    #[error("Failed to save state: {reason}")]
    SaveFailed {
        /// Reason for the error
        reason: String,
    },

    /// Failed to rename the progress file to its completion marker
    #[error("Failed to mark release complete: {reason}")]
    CompleteFailed {
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Reading operator input failed
    #[error("Prompt failed: {reason}")]
    PromptFailed {
        /// Reason for the error
        reason: String,
    },
}

/// GitHub errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Remote URL does not point at GitHub
    #[error("Could not parse GitHub owner/repo from URL: '{url}'")]
    UnparsableRemote {
        /// Remote URL
        url: String,
    },

    /// Pull request creation requested without a token
    #[error("GitHub token not provided. Set GH_TOKEN or GITHUB_TOKEN or use --github-token")]
    MissingToken,

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Pull request creation returned a non-success status
    #[error("Pull request creation failed: {status_code} {status_text}")]
    PullRequestRejected {
        /// HTTP status code
        status_code: u16,
        /// HTTP reason phrase
        status_text: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Git(GitError::NotRepository) => vec![
                "Navigate to a directory inside a git work tree".to_string(),
                "Initialize a repository: git init".to_string(),
            ],
            ReleaseError::Git(GitError::GitNotFound { .. }) => {
                vec!["Install git and make sure it is on PATH".to_string()]
            }
            ReleaseError::Git(GitError::MergeFailed { .. }) => vec![
                "Resolve the conflict, commit, then run the tool again to resume".to_string(),
                "Abort the merge: git merge --abort".to_string(),
            ],
            ReleaseError::Git(GitError::PushFailed { .. }) => vec![
                "Verify git remote URL: git remote -v".to_string(),
                "Check SSH key configuration: ssh -T git@github.com".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::MissingToken) => vec![
                "Export GITHUB_TOKEN with repo scope".to_string(),
                "Or drop --create-pr and open the printed compare URL manually".to_string(),
            ],
            ReleaseError::Version(VersionError::SetFailed { .. }) => vec![
                "Commit or stash changes: npm version refuses a dirty tree".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
