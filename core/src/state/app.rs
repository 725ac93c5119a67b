//! Process-wide request status and last error.

use serde::{Deserialize, Serialize};

use crate::error::Failure;

/// Lifecycle of a request, shared by the global tracker and per-todolist
/// `entity_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The status tracker. Writes are unvalidated and last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    status: RequestStatus,
    error: Option<String>,
    is_initialized: bool,
    is_logged_in: bool,
}

impl AppState {
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_initialized(&mut self, value: bool) {
        self.is_initialized = value;
    }

    pub fn set_logged_in(&mut self, value: bool) {
        self.is_logged_in = value;
    }

    /// Records a rejected operation: message first, then `failed`.
    pub(crate) fn report(&mut self, failure: &Failure) {
        self.set_error(Some(failure.user_message()));
        self.set_status(RequestStatus::Failed);
    }
}
