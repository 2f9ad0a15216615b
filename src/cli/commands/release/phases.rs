//! Individual steps of the release process.

use super::{Halt, IdentityLookup, ReleaseProcess};
use crate::cli::{BranchSelection, NewBranch, Prompter};
use crate::error::{GitError, GitHubError, ReleaseError, VersionError};
use crate::git::branches::format_tag;
use crate::git::{GitOperations, diff_branches};
use crate::github::{PullRequestApi, PullRequestOptions, RepoIdentity, parse_github_url};
use crate::state::ReleaseState;
use crate::version::{PackageVersion, suggest_next_version};
use std::sync::Arc;

type StepResult<T = ()> = std::result::Result<T, Halt>;

const BEGIN_MERGE: &str = "🔗  Beginning merge process";
const EXIT_AFTER_MERGE_FAIL: &str = "🚫  It seems a merge failed. The release process will terminate to allow you to resolve the issue.";
const SETTING_NEXT_NPM_VERSION: &str = "🔧  Setting the next NPM version";
const PUSHING_GIT_TAGS: &str = "🏷  Pushing branch and git tags";

impl<G, N, H, P> ReleaseProcess<G, N, H, P>
where
    G: GitOperations + 'static,
    N: PackageVersion,
    H: PullRequestApi,
    P: Prompter,
{
    pub(super) async fn check_repository(&mut self) -> StepResult {
        if !self.git.is_repository().await {
            return Err(ReleaseError::from(GitError::NotRepository).into());
        }
        Ok(())
    }

    pub(super) fn offer_resume(&mut self) -> StepResult {
        if !self.release_file_located {
            self.state.resume = false;
            return Ok(());
        }

        let summary = self.state.summary();
        if self.prompter.resume(&summary)? {
            self.state.resume = true;
            self.output.info("Resuming the previous release");
        } else {
            // Start over from a clean snapshot; the old file is overwritten on the next save
            self.state = ReleaseState::new();
            self.output.info("Starting a new release");
        }
        Ok(())
    }

    /// Resolve owner/repo on a background task while the operator answers prompts
    pub(super) fn start_identity_lookup(&mut self) {
        if let Some((owner, repo)) = self.state.identity() {
            self.identity = IdentityLookup::Resolved(RepoIdentity::new(owner, repo));
            return;
        }

        let git = Arc::clone(&self.git);
        self.identity = IdentityLookup::Pending(tokio::spawn(async move {
            let url = git.remote_url().await?;
            parse_github_url(&url)
        }));
    }

    /// Surface a lookup that has already finished without waiting on one still running
    pub(super) async fn poll_identity(&mut self) -> StepResult {
        let finished = matches!(
            &self.identity,
            IdentityLookup::Pending(handle) if handle.is_finished()
        );
        if finished {
            self.repo_identity().await?;
        }
        Ok(())
    }

    /// Wait for the identity; versioning and pushing never start without it
    pub(super) async fn require_identity(&mut self) -> StepResult {
        self.repo_identity().await.map(|_| ())
    }

    /// Join the identity lookup, recording owner/repo in the state
    async fn repo_identity(&mut self) -> StepResult<RepoIdentity> {
        let lookup = std::mem::replace(&mut self.identity, IdentityLookup::NotStarted);
        let identity = match lookup {
            IdentityLookup::Resolved(identity) => identity,
            IdentityLookup::Pending(handle) => handle.await.map_err(|e| Halt::Fatal {
                messages: vec![format!("Repository identity lookup failed: {}", e)],
                suggestions: Vec::new(),
            })??,
            IdentityLookup::NotStarted => {
                let url = self.git.remote_url().await?;
                parse_github_url(&url)?
            }
        };

        self.state.owner = Some(identity.owner.clone());
        self.state.repo = Some(identity.repo.clone());
        self.identity = IdentityLookup::Resolved(identity.clone());
        Ok(identity)
    }

    pub(super) async fn setup_branch(&mut self) -> StepResult {
        if let Some(branch) = self.stored_answer(&self.state.branch_name) {
            self.output
                .info(&format!("Using branch from the previous run: {}", branch));
            let message = self.git.checkout_branch(&branch).await?;
            self.output.success(&message);
            return Ok(());
        }

        match self.prompter.new_branch(&self.config.default_base_branch)? {
            NewBranch::UseCurrent => {
                let current = self.git.current_branch_name().await?;
                self.output.info(&format!("Using the current branch: {}", current));
                self.state.branch_name = Some(current);
                self.state.base_branch = None;
                self.state.use_existing_branch = true;
            }
            NewBranch::Create { name, base } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(ReleaseError::from(GitError::BranchNameRequired).into());
                }
                let message = self.git.create_branch(&name, &base).await?;
                self.output.success(&message);
                self.state.branch_name = Some(name);
                self.state.base_branch = Some(base);
                self.state.use_existing_branch = false;
            }
        }
        Ok(())
    }

    pub(super) async fn merge_selected_branches(&mut self) -> StepResult {
        let wish_to_merge = match self.stored_answer(&self.state.wish_to_merge) {
            Some(wish) => wish,
            None => {
                let wish = self.prompter.wish_to_merge()?;
                self.state.wish_to_merge = Some(wish);
                wish
            }
        };
        if !wish_to_merge {
            return Ok(());
        }

        // An empty selection only counts when the operator chose to continue anyway
        let selection_recorded = !self.state.selected_branches.is_empty()
            || self.state.should_continue == Some(true);
        if self.state.resume && selection_recorded {
            self.output.info(&format!(
                "Using branches selected in the previous run: {}",
                self.state.selected_branches.join(", ")
            ));
        } else {
            self.select_branches().await?;
        }

        if self.state.selected_branches.is_empty() {
            return Ok(());
        }

        let diff = diff_branches(&self.state.selected_branches, &self.state.merged_branches);
        for branch in &diff.in_both {
            self.output.indent(&format!("Skipping {} (already merged)", branch));
        }

        let pending: Vec<String> = diff
            .pending_in_order(&self.state.selected_branches)
            .into_iter()
            .map(str::to_string)
            .collect();
        if pending.is_empty() {
            self.output.info("All selected branches are already merged");
            return Ok(());
        }

        self.output.section(BEGIN_MERGE);
        for branch in pending {
            match self.git.merge_branch(&branch).await {
                Ok(_) => {
                    self.state.record_merged(&branch);
                    self.output
                        .success(&format!("✅  Branch merged successfully: {}", branch));
                }
                Err(e) => return Err(Halt::fatal(&e, &[EXIT_AFTER_MERGE_FAIL])),
            }
        }
        Ok(())
    }

    async fn select_branches(&mut self) -> StepResult {
        let current = self.state.branch_name.clone().unwrap_or_default();

        self.git.fetch_all().await?;
        let available: Vec<String> = self
            .git
            .list_remote_branches()
            .await?
            .into_iter()
            .filter(|branch| *branch != current)
            .collect();

        let BranchSelection {
            selected,
            should_continue,
        } = self.prompter.select_branches(&available, &current)?;

        self.state.selected_branches = selected;
        self.state.should_continue = Some(should_continue);
        self.state.touch();

        if self.state.selected_branches.is_empty() && !should_continue {
            return Err(Halt::Goodbye);
        }
        Ok(())
    }

    pub(super) async fn decide_version(&mut self) -> StepResult {
        if let Some(version) = self.stored_answer(&self.state.next_release_version) {
            self.output
                .info(&format!("Using release version from the previous run: {}", version));
            return Ok(());
        }

        let current = self.package.read_current_version();
        let suggested = current
            .as_deref()
            .and_then(|v| suggest_next_version(v, &self.state.selected_branches));

        let next = self.prompter.next_version(suggested.as_deref())?;
        let next = next.trim().to_string();
        if next.is_empty() {
            return Err(ReleaseError::from(VersionError::NotSelected).into());
        }

        if suggested.as_deref() == Some(next.as_str()) {
            self.output.progress(SETTING_NEXT_NPM_VERSION);
            let output = self.package.set_version(&next).await?;
            self.output.success(&format!("Version set: {}", output));
        } else {
            let tag = self.git.tag_version(&next).await?;
            self.output.success(&format!("Tagged {}", tag));
        }

        self.state.next_release_version = Some(next);
        Ok(())
    }

    pub(super) async fn publish(&mut self) -> StepResult {
        let branch = self.release_branch();
        self.output.progress(PUSHING_GIT_TAGS);

        let pushed_branch = self.git.push(&branch).await;
        let pushed_tags = self.git.push_tags().await;

        let errors: Vec<ReleaseError> = [pushed_branch.err(), pushed_tags.err()]
            .into_iter()
            .flatten()
            .collect();
        if let Some(first) = errors.first() {
            return Err(Halt::Fatal {
                messages: errors.iter().map(ToString::to_string).collect(),
                suggestions: first.recovery_suggestions(),
            });
        }

        self.output.success(&format!("Pushed {} and tags", branch));
        Ok(())
    }

    pub(super) async fn open_staging_pull_request(&mut self) -> StepResult {
        let staging = match self.stored_answer(&self.state.staging_branch) {
            Some(staging) => Some(staging),
            None => self
                .prompter
                .staging_branch(&self.config.default_staging_branch)?,
        };
        let Some(staging) = staging else {
            self.output.info("Skipping the staging pull request");
            return Ok(());
        };

        let identity = self.repo_identity().await?;
        let branch = self.release_branch();
        let compare_url = identity.compare_url(&staging, &branch);

        if self.config.create_pull_request {
            let options = self.pull_request_options(&branch, &staging);
            let response = self
                .pull_requests
                .create_pull_request(&identity.owner, &identity.repo, &options)
                .await?;
            if !response.is_created() {
                return Err(ReleaseError::from(GitHubError::PullRequestRejected {
                    status_code: response.status_code,
                    status_text: response.status_text,
                })
                .into());
            }
            self.output.success(&format!(
                "Pull request created: {}",
                response.url.unwrap_or(compare_url)
            ));
        } else {
            self.output
                .info(&format!("Open the pull request into {}: {}", staging, compare_url));
        }

        self.state.staging_branch = Some(staging);
        Ok(())
    }

    pub(super) async fn build_release_url(&mut self) -> StepResult {
        let identity = self.repo_identity().await?;
        let version = self.state.next_release_version.clone().unwrap_or_default();
        let url = identity.new_release_url(&version);

        self.output.info(&format!("Draft the release notes: {}", url));
        self.state.release_url = Some(url);
        Ok(())
    }

    fn release_branch(&self) -> String {
        self.state.branch_name.clone().unwrap_or_default()
    }

    fn pull_request_options(&self, branch: &str, staging: &str) -> PullRequestOptions {
        let tag = format_tag(self.state.next_release_version.as_deref().unwrap_or_default());
        let merged = self
            .state
            .merged_branches
            .iter()
            .map(|b| format!("- {}", b))
            .collect::<Vec<_>>()
            .join("\n");

        PullRequestOptions {
            title: format!("Release {}", tag),
            head: branch.to_string(),
            base: staging.to_string(),
            body: if merged.is_empty() {
                format!("Release {}", tag)
            } else {
                format!("Release {}\n\nIncludes:\n{}", tag, merged)
            },
        }
    }
}
