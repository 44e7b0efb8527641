// failure-notifier-rs/src/main.rs
// Lambda entry point: reports failed CodeBuild runs back to CodePipeline

use failure_notifier::config::NotifierConfig;
use failure_notifier::logging::{init_logging, LoggingConfig};
use failure_notifier::{handler, orchestration, FailureNotifier};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    init_logging(&LoggingConfig::from_env())?;

    let config = NotifierConfig::from_env()?;
    tracing::info!(
        failure_message = %config.failure_message,
        job_token_variable = %config.variables.job_token,
        execution_id_variable = %config.variables.execution_id,
        pipeline_name_variable = %config.variables.pipeline_name,
        dry_run = config.dry_run,
        "Failure notifier configured"
    );

    let service = orchestration::from_config(&config).await;
    let notifier = FailureNotifier::with_config(service, &config);
    let notifier = &notifier;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler::handle(notifier, event).await
    }))
    .await
}
