//! Lambda invocation interface

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::instrument::Instrument;
use tracing::info_span;

use crate::notifier::FailureNotifier;

/// Handle one invocation. Never fails: problems with the event or with
/// CodePipeline come back as `false` so the runtime does not retry.
pub async fn handle(notifier: &FailureNotifier, event: LambdaEvent<Value>) -> Result<bool, Error> {
    let (payload, context) = event.into_parts();
    let span = info_span!("invocation", request_id = %context.request_id);

    Ok(notifier.notify_payload(payload).instrument(span).await)
}
