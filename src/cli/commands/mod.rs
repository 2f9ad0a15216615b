//! Command execution: wires the real collaborators into the release process.

mod release;

pub use release::{Collaborators, Halt, ReleaseOutcome, ReleaseProcess};

use crate::cli::{Args, OutputManager, TerminalPrompter};
use crate::error::Result;
use crate::git::SystemGit;
use crate::github::GitHubClient;
use crate::state::StateManager;
use crate::version::NpmPackage;

/// Execute a release run in the current directory, returning the exit code
pub async fn execute_command(args: Args) -> Result<i32> {
    let output = OutputManager::new(false);

    if let Err(validation_error) = args.validate() {
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let work_dir = std::env::current_dir()?;
    let config = args.release_config(work_dir);
    log::debug!("Release configuration: {:?}", config);

    let collaborators = Collaborators {
        git: SystemGit::new(&config.work_dir, config.remote.clone())?,
        package: NpmPackage::new(&config.work_dir),
        pull_requests: GitHubClient::new(
            config.github_api_url.clone(),
            config.github_token.clone(),
        )?,
        prompter: TerminalPrompter::stdio(),
    };

    let state_manager = StateManager::new(&config.work_dir);
    let loaded = state_manager.load();
    if loaded.release_file_located {
        log::info!(
            "Found release progress at {}",
            state_manager.state_file_path().display()
        );
    }

    let mut process = ReleaseProcess::new(config, output, state_manager, loaded, collaborators);
    let outcome = process.run().await;
    log::debug!("Release run finished: {:?}", outcome);

    Ok(outcome.exit_code())
}
