//! State persistence for release runs.
//!
//! Loading never fails: a missing or unreadable progress file simply means a
//! fresh run. Saving is best-effort on the exit path, so callers that are
//! already terminating use [`StateManager::serialize`], which logs instead of
//! returning errors.

use crate::error::{Result, StateError};
use crate::state::ReleaseState;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Canonical progress file name, relative to the repository working directory
pub const PROGRESS_FILE: &str = ".release_train_progress.json";

/// Name the progress file is renamed to once a release finishes
pub const PROGRESS_FILE_COMPLETE: &str = ".release_train_progress.complete.json";

/// State manager for the progress file
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the progress file
    state_file_path: PathBuf,
    /// Path the progress file is renamed to on completion
    complete_file_path: PathBuf,
}

/// Result of state loading operation
#[derive(Debug)]
pub struct LoadStateResult {
    /// Loaded (or fresh) release state
    pub state: ReleaseState,
    /// Whether a prior progress file was found and parsed
    pub release_file_located: bool,
}

impl StateManager {
    /// Create a state manager for the progress file in `dir`
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            state_file_path: dir.join(PROGRESS_FILE),
            complete_file_path: dir.join(PROGRESS_FILE_COMPLETE),
        }
    }

    /// Path of the progress file
    pub fn state_file_path(&self) -> &Path {
        &self.state_file_path
    }

    /// Path of the completion marker
    pub fn complete_file_path(&self) -> &Path {
        &self.complete_file_path
    }

    /// Load the progress file, falling back to a fresh state on any failure
    pub fn load(&self) -> LoadStateResult {
        match self.load_from_file(&self.state_file_path) {
            Ok(state) => {
                log::debug!("Loaded release state from {}", self.state_file_path.display());
                LoadStateResult {
                    state,
                    release_file_located: true,
                }
            }
            Err(e) => {
                log::debug!("No resumable release state: {}", e);
                LoadStateResult {
                    state: ReleaseState::new(),
                    release_file_located: false,
                }
            }
        }
    }

    /// Write state to the progress file, overwriting it
    pub fn save(&self, state: &ReleaseState) -> Result<()> {
        let serialized =
            serde_json::to_string_pretty(state).map_err(|e| StateError::SaveFailed {
                reason: format!("Failed to serialize state: {}", e),
            })?;

        // Write to temporary file first, then rename over the real one
        let temp_file_path = self.state_file_path.with_extension("tmp");

        {
            let mut file =
                fs::File::create(&temp_file_path).map_err(|e| StateError::SaveFailed {
                    reason: format!("Failed to create temp file: {}", e),
                })?;

            file.write_all(serialized.as_bytes())
                .map_err(|e| StateError::SaveFailed {
                    reason: format!("Failed to write state: {}", e),
                })?;

            file.sync_all().map_err(|e| StateError::SaveFailed {
                reason: format!("Failed to sync file: {}", e),
            })?;
        }

        fs::rename(&temp_file_path, &self.state_file_path).map_err(|e| StateError::SaveFailed {
            reason: format!("Failed to rename temp file: {}", e),
        })?;

        Ok(())
    }

    /// Best-effort save; failures are logged and swallowed
    pub fn serialize(&self, state: &ReleaseState) -> bool {
        match self.save(state) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Unable to serialise release state: {}", e);
                false
            }
        }
    }

    /// Save, then rename the progress file to the completion marker
    pub fn serialize_and_complete(&self, state: &ReleaseState) -> Result<()> {
        self.save(state)?;
        fs::rename(&self.state_file_path, &self.complete_file_path).map_err(|e| {
            StateError::CompleteFailed {
                reason: format!(
                    "Failed to rename {} to {}: {}",
                    self.state_file_path.display(),
                    self.complete_file_path.display(),
                    e
                ),
            }
        })?;
        Ok(())
    }

    fn load_from_file(&self, file_path: &Path) -> Result<ReleaseState> {
        let contents = fs::read_to_string(file_path)?;
        let state: ReleaseState = serde_json::from_str(&contents)?;
        Ok(state)
    }
}
