//! Release state tracking and serialization.

use serde::{Deserialize, Serialize};

/// Everything decided or observed so far in a release run.
///
/// Field names are camelCase on disk so progress files stay readable and
/// compatible across tool versions. Every field defaults when absent, so a
/// partially written snapshot still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseState {
    /// Repository owner on the hosting service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repository name on the hosting service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Branch the release branch forks from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    /// Branch the release is built on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    /// Whether `branch_name` pre-existed rather than being created
    pub use_existing_branch: bool,
    /// Whether the operator opted to merge other branches in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wish_to_merge: Option<bool>,
    /// Branches chosen to merge, in selection order
    pub selected_branches: Vec<String>,
    /// Branches merged so far, accumulated across resumes
    pub merged_branches: Vec<String>,
    /// Computed/confirmed next version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_release_version: Option<String>,
    /// Target branch for the staging pull request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_branch: Option<String>,
    /// Generated release-notes URL
    #[serde(rename = "releaseURL", skip_serializing_if = "Option::is_none")]
    pub release_url: Option<String>,
    /// Whether the operator chose to resume a prior run
    pub resume: bool,
    /// Whether to proceed despite zero selected branches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_continue: Option<bool>,
    /// Fatal error messages recorded for this run
    pub error: Vec<String>,
    /// When this release run was first started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    /// When this state was last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReleaseState {
    /// Create an empty state for a fresh run
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            started_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Append one error message. Empty messages are ignored.
    pub fn add_error(&mut self, message: impl AsRef<str>) {
        self.add_errors([message]);
    }

    /// Append several error messages, skipping empty ones.
    pub fn add_errors<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.error.len();
        self.error.extend(
            messages
                .into_iter()
                .map(|m| m.as_ref().to_string())
                .filter(|m| !m.is_empty()),
        );
        if self.error.len() != before {
            self.touch();
        }
    }

    /// Record a branch as merged. Already-recorded branches are not duplicated.
    pub fn record_merged(&mut self, branch: &str) {
        if !self.merged_branches.iter().any(|b| b == branch) {
            self.merged_branches.push(branch.to_string());
        }
        self.touch();
    }

    /// Owner and repo if both are known
    pub fn identity(&self) -> Option<(&str, &str)> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => Some((owner.as_str(), repo.as_str())),
            _ => None,
        }
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Some(chrono::Utc::now());
    }

    /// Create a one-line summary of the release state
    pub fn summary(&self) -> String {
        format!(
            "branch {} · {} selected · {} merged · version {}",
            self.branch_name.as_deref().unwrap_or("-"),
            self.selected_branches.len(),
            self.merged_branches.len(),
            self.next_release_version.as_deref().unwrap_or("-"),
        )
    }
}
