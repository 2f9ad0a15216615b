//! Core Git operations trait for the release workflow.
//!
//! The release orchestrator only talks to git through [`GitOperations`]. The
//! production implementation shells out to the git binary (see
//! [`SystemGit`](super::SystemGit)); tests substitute an in-memory double.

use crate::error::Result;
use std::future::Future;

/// Git operations required by the release workflow
///
/// Futures are `Send` so that identity resolution can run on a spawned task
/// while the operator answers prompts.
pub trait GitOperations: Send + Sync {
    /// Whether the working directory is inside a git work tree
    fn is_repository(&self) -> impl Future<Output = bool> + Send;

    /// Fetch every remote
    fn fetch_all(&self) -> impl Future<Output = Result<()>> + Send;

    /// Remote branch names with the remote prefix stripped
    fn list_remote_branches(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Create `name` from `base` and check it out
    fn create_branch(&self, name: &str, base: &str) -> impl Future<Output = Result<String>> + Send;

    /// Check out an existing branch
    fn checkout_branch(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// Merge the remote-tracking `name` into the current branch, returning the branch merged
    fn merge_branch(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// Push `branch` and set its upstream
    fn push(&self, branch: &str) -> impl Future<Output = Result<String>> + Send;

    /// Push all tags
    fn push_tags(&self) -> impl Future<Output = Result<String>> + Send;

    /// Create an annotated tag for `version`
    fn tag_version(&self, version: &str) -> impl Future<Output = Result<String>> + Send;

    /// Name of the checked-out branch
    fn current_branch_name(&self) -> impl Future<Output = Result<String>> + Send;

    /// URL of the configured remote
    fn remote_url(&self) -> impl Future<Output = Result<String>> + Send;
}
