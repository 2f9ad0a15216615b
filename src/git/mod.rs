//! Git operations for the release workflow.
//!
//! The workflow depends only on the [`GitOperations`] trait; [`SystemGit`]
//! implements it by invoking the git binary.

pub mod branches;
mod operations;
mod system;

pub use branches::{BranchDiff, diff_branches};
pub use operations::GitOperations;
pub use system::SystemGit;
