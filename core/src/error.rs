//! Error types for the todolist client.
//!
//! # Design
//! `ApiError` describes what went wrong below the envelope: the transport
//! failed, the server answered with a non-2xx status, or a body did not
//! match the schema. `Failure` is what operations reject with; every
//! `ApiError` collapses into `Failure::Network`, while a non-zero
//! `resultCode` becomes `Failure::Application`.

use thiserror::Error;

use crate::types::FieldError;

/// Fallback text shown when the server or transport gave nothing usable.
pub const GENERIC_ERROR_MESSAGE: &str = "Some error occurred";

/// Transport and decoding errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    /// The body is kept for logs but left out of the message, which ends up
    /// in front of the user.
    #[error("server responded with HTTP {status}")]
    HttpError { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
}

/// Rejection reason of a synchronization operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The server processed the request and refused it (`resultCode != 0`).
    #[error("{}", first_or_generic(.messages))]
    Application {
        messages: Vec<String>,
        fields_errors: Vec<FieldError>,
    },

    /// The request did not complete or the reply was unusable.
    #[error("{}", or_generic(.0))]
    Network(String),

    /// `update_task` found no local record to merge the patch onto.
    #[error("task {task_id} not found in todolist {todolist_id}")]
    TaskNotFound {
        todolist_id: String,
        task_id: String,
    },
}

impl Failure {
    pub fn application(messages: Vec<String>) -> Self {
        Failure::Application {
            messages,
            fields_errors: Vec::new(),
        }
    }

    /// The text the UI shows for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Per-field errors for inline form feedback; empty for anything but an
    /// application failure.
    pub fn fields_errors(&self) -> &[FieldError] {
        match self {
            Failure::Application { fields_errors, .. } => fields_errors,
            _ => &[],
        }
    }

    /// True for failures that must be reported through the status tracker.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Failure::TaskNotFound { .. })
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        Failure::Network(err.to_string())
    }
}

fn first_or_generic(messages: &[String]) -> &str {
    messages.first().map_or(GENERIC_ERROR_MESSAGE, |m| or_generic(m))
}

fn or_generic(message: &str) -> &str {
    if message.is_empty() {
        GENERIC_ERROR_MESSAGE
    } else {
        message
    }
}
