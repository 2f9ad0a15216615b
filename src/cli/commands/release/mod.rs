//! The resumable release process.
//!
//! [`ReleaseProcess`] runs the workflow steps in order against a
//! [`ReleaseState`] loaded from the progress file. Each step checks its own
//! field in the state first, so a resumed run skips questions that were
//! already answered and work that was already done. Every failure is turned
//! into a [`Halt`] and handled by one termination routine, which persists the
//! state before the process exits.

mod phases;

use crate::ReleaseConfig;
use crate::cli::{OutputManager, Prompter};
use crate::error::{ReleaseError, Result};
use crate::git::GitOperations;
use crate::github::{PullRequestApi, RepoIdentity};
use crate::state::{LoadStateResult, ReleaseState, StateManager};
use crate::version::PackageVersion;
use std::sync::Arc;
use tokio::task::JoinHandle;

const GOODBYE: &str = "Goodbye  👋";
const RELEASE_PROCESS_FINISHED: &str = "🏁  Release process finished  🎉";
const UNABLE_TO_SERIALISE: &str = "Unable to save release progress; the next run cannot resume it.";
const RECOVERY_SUGGESTIONS: &str = "\n💡 Recovery suggestions:";

/// Why the process stopped before finishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Fatal error; messages are printed and recorded in the state's error log
    Fatal {
        /// Error messages, in the order they occurred
        messages: Vec<String>,
        /// Operator hints printed after the messages
        suggestions: Vec<String>,
    },
    /// Operator chose to stop; not an error
    Goodbye,
}

impl Halt {
    /// Fatal halt for `error`, followed by `extra` messages
    pub fn fatal(error: &ReleaseError, extra: &[&str]) -> Self {
        let mut messages = vec![error.to_string()];
        messages.extend(extra.iter().map(|m| m.to_string()));
        Halt::Fatal {
            messages,
            suggestions: error.recovery_suggestions(),
        }
    }
}

impl From<ReleaseError> for Halt {
    fn from(error: ReleaseError) -> Self {
        Halt::fatal(&error, &[])
    }
}

/// Final result of a release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Every step finished; the progress file was marked complete
    Completed,
    /// The operator stopped the run
    Goodbye,
    /// A step failed with these messages
    Failed(Vec<String>),
}

impl ReleaseOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseOutcome::Completed | ReleaseOutcome::Goodbye => 0,
            ReleaseOutcome::Failed(_) => 1,
        }
    }
}

/// External collaborators the release process drives
#[derive(Debug)]
pub struct Collaborators<G, N, H, P> {
    /// Version control
    pub git: G,
    /// Package manifest version
    pub package: N,
    /// Hosting pull request API
    pub pull_requests: H,
    /// Operator prompts
    pub prompter: P,
}

/// Owner/repo lookup started in the background at the beginning of a run
enum IdentityLookup {
    NotStarted,
    Pending(JoinHandle<Result<RepoIdentity>>),
    Resolved(RepoIdentity),
}

/// Release workflow driver
pub struct ReleaseProcess<G, N, H, P> {
    config: ReleaseConfig,
    output: OutputManager,
    state_manager: StateManager,
    state: ReleaseState,
    release_file_located: bool,
    git: Arc<G>,
    package: N,
    pull_requests: H,
    prompter: P,
    identity: IdentityLookup,
}

impl<G, N, H, P> ReleaseProcess<G, N, H, P>
where
    G: GitOperations + 'static,
    N: PackageVersion,
    H: PullRequestApi,
    P: Prompter,
{
    /// Create a release process over a loaded (or fresh) state
    pub fn new(
        config: ReleaseConfig,
        output: OutputManager,
        state_manager: StateManager,
        loaded: LoadStateResult,
        collaborators: Collaborators<G, N, H, P>,
    ) -> Self {
        Self {
            config,
            output,
            state_manager,
            state: loaded.state,
            release_file_located: loaded.release_file_located,
            git: Arc::new(collaborators.git),
            package: collaborators.package,
            pull_requests: collaborators.pull_requests,
            prompter: collaborators.prompter,
            identity: IdentityLookup::NotStarted,
        }
    }

    /// Current release state
    pub fn state(&self) -> &ReleaseState {
        &self.state
    }

    /// Run every step, then finalize or terminate
    pub async fn run(&mut self) -> ReleaseOutcome {
        match self.run_steps().await {
            Ok(()) => self.finalize(),
            Err(halt) => self.terminate(halt),
        }
    }

    async fn run_steps(&mut self) -> std::result::Result<(), Halt> {
        self.check_repository().await?;
        self.offer_resume()?;
        self.start_identity_lookup();

        self.setup_branch().await?;
        self.poll_identity().await?;
        self.checkpoint();

        self.merge_selected_branches().await?;
        self.checkpoint();

        self.require_identity().await?;
        self.decide_version().await?;
        self.checkpoint();

        self.publish().await?;

        self.open_staging_pull_request().await?;
        self.checkpoint();

        self.build_release_url().await?;
        Ok(())
    }

    /// The single exit path for fatal errors and goodbyes
    fn terminate(&mut self, halt: Halt) -> ReleaseOutcome {
        if let IdentityLookup::Pending(handle) =
            std::mem::replace(&mut self.identity, IdentityLookup::NotStarted)
        {
            handle.abort();
        }

        let outcome = match halt {
            Halt::Fatal {
                messages,
                suggestions,
            } => {
                for message in &messages {
                    self.output.error(message);
                }
                if !suggestions.is_empty() {
                    self.output.println(RECOVERY_SUGGESTIONS);
                    for suggestion in &suggestions {
                        self.output.indent(suggestion);
                    }
                }
                self.state.add_errors(&messages);
                ReleaseOutcome::Failed(messages)
            }
            Halt::Goodbye => {
                self.output.println(GOODBYE);
                ReleaseOutcome::Goodbye
            }
        };

        self.state.touch();
        if !self.state_manager.serialize(&self.state) {
            self.output.error(UNABLE_TO_SERIALISE);
        }
        outcome
    }

    fn finalize(&mut self) -> ReleaseOutcome {
        self.state.touch();
        if let Err(e) = self.state_manager.serialize_and_complete(&self.state) {
            self.output.warn(&e.to_string());
        }
        self.output.success(RELEASE_PROCESS_FINISHED);
        ReleaseOutcome::Completed
    }

    /// Save progress after a completed step
    fn checkpoint(&mut self) {
        self.state.touch();
        if self.state_manager.serialize(&self.state) {
            log::debug!("Saved progress checkpoint: {}", self.state.summary());
        }
    }

    /// A stored answer, honoured only when the operator chose to resume
    fn stored_answer<T: Clone>(&self, stored: &Option<T>) -> Option<T> {
        if self.state.resume {
            stored.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitError;

    #[test]
    fn test_fatal_halt_carries_recovery_suggestions() {
        let error = ReleaseError::from(GitError::MergeFailed {
            branch: "fix/b".to_string(),
            reason: "conflict".to_string(),
        });
        let Halt::Fatal {
            messages,
            suggestions,
        } = Halt::fatal(&error, &["stopping"])
        else {
            panic!("expected a fatal halt");
        };

        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("fix/b"));
        assert_eq!(messages[1], "stopping");
        assert_eq!(suggestions, error.recovery_suggestions());
        assert!(!suggestions.is_empty());
    }

    #[test]
    fn test_goodbye_exits_cleanly() {
        assert_eq!(ReleaseOutcome::Goodbye.exit_code(), 0);
        assert_eq!(ReleaseOutcome::Failed(vec!["x".to_string()]).exit_code(), 1);
    }
}
