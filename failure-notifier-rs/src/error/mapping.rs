//! Error mapping for the CodePipeline SDK
//!
//! Converts SDK failures into [`NotifierError::OrchestrationCall`], keeping
//! the service error code (e.g. `JobNotFoundException`) when CodePipeline
//! returned one.

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_sdk_codepipeline::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};

use super::NotifierError;

/// Map an SDK operation error to a NotifierError
pub fn map_sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> NotifierError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug,
{
    let code = err.code().map(str::to_string);

    // Service errors carry a message; transport and signing failures only
    // describe themselves through their source chain.
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };

    NotifierError::orchestration_call(operation, code, message)
}

/// Map a request builder error to a NotifierError
pub fn map_build_error(operation: &'static str, err: BuildError) -> NotifierError {
    NotifierError::orchestration_call(
        operation,
        None,
        format!("Invalid request: {}", DisplayErrorContext(&err)),
    )
}
