//! State management for release runs.
//!
//! This module provides the persisted release state and the progress file
//! it lives in, enabling resume after a failure or interruption.

mod manager;
mod release_state;

pub use manager::{LoadStateResult, PROGRESS_FILE, PROGRESS_FILE_COMPLETE, StateManager};
pub use release_state::ReleaseState;

