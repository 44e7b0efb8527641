//! Error handling for the failure notifier
//!
//! Two kinds of failure can happen while reporting a broken build: the
//! inbound event is missing something we need, or CodePipeline rejects the
//! call. Both are recovered inside [`crate::FailureNotifier::notify`]; only
//! configuration errors escape to the binary.

use thiserror::Error;

pub mod mapping;

/// Result type for notifier operations
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Main error type for the failure notifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    /// A field required to build the report is missing from the event
    #[error("Malformed event: missing {field}: {detail}")]
    MalformedEvent {
        field: &'static str,
        detail: String,
    },

    /// The orchestration service rejected or failed the outbound call
    #[error("{operation} failed{}: {message}", code_suffix(.code))]
    OrchestrationCall {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    /// The event describes a build that did not fail
    #[error("Build status is {0}, not FAILED")]
    UnexpectedBuildStatus(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl NotifierError {
    /// Create a malformed event error for a missing field
    pub fn malformed_event(field: &'static str, detail: impl Into<String>) -> Self {
        NotifierError::MalformedEvent {
            field,
            detail: detail.into(),
        }
    }

    /// Create an orchestration call error
    pub fn orchestration_call(
        operation: &'static str,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        NotifierError::OrchestrationCall {
            operation,
            code,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        NotifierError::Configuration(message.into())
    }

    /// Check if the event itself was at fault
    pub fn is_malformed_event(&self) -> bool {
        matches!(self, NotifierError::MalformedEvent { .. })
    }

    /// Check if the orchestration service was at fault
    pub fn is_orchestration_call(&self) -> bool {
        matches!(self, NotifierError::OrchestrationCall { .. })
    }

    /// Service error code returned by CodePipeline, if any
    pub fn error_code(&self) -> Option<&str> {
        match self {
            NotifierError::OrchestrationCall { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Name of the missing event field, if this is a malformed event
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            NotifierError::MalformedEvent { field, .. } => Some(*field),
            _ => None,
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({})", c))
        .unwrap_or_default()
}

/// Convert serde_json errors on the inbound payload
impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::malformed_event("event", format!("JSON error: {}", err))
    }
}
