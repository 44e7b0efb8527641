//! CodePipeline client
//!
//! Thin wrapper over `aws-sdk-codepipeline`. Retries are switched off: a
//! rejected report is final for the invocation, and CodePipeline itself
//! times out jobs nobody reports on.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_codepipeline::config::retry::RetryConfig;
use aws_sdk_codepipeline::config::timeout::TimeoutConfig;
use aws_sdk_codepipeline::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_codepipeline::types::{FailureDetails, FailureType};
use aws_sdk_codepipeline::Client;
use tracing::debug;

use super::OrchestrationService;
use crate::config::NotifierConfig;
use crate::error::mapping::{map_build_error, map_sdk_error};
use crate::error::Result;

const PUT_JOB_FAILURE_RESULT: &str = "PutJobFailureResult";
const STOP_PIPELINE_EXECUTION: &str = "StopPipelineExecution";

/// Region used when neither the builder nor the environment names one
const FALLBACK_REGION: &str = "us-east-1";

/// CodePipeline-backed orchestration service
#[derive(Debug, Clone)]
pub struct CodePipelineClient {
    client: Client,
}

impl CodePipelineClient {
    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a client from ambient AWS configuration (environment,
    /// profile, or the Lambda execution role), applying overrides from
    /// the notifier configuration
    pub async fn from_config(config: &NotifierConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(timeout) = config.operation_timeout() {
            loader = loader.timeout_config(
                TimeoutConfig::builder().operation_timeout(timeout).build(),
            );
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_codepipeline::config::Builder::from(&sdk_config);

        if let Some(endpoint_url) = &config.endpoint_url {
            debug!(endpoint_url = %endpoint_url, "Using CodePipeline endpoint override");
            builder = builder.endpoint_url(endpoint_url.clone());
        }

        Self::from_client(Client::from_conf(builder.build()))
    }

    /// Create a builder for an explicitly configured client
    pub fn builder() -> CodePipelineClientBuilder {
        CodePipelineClientBuilder::default()
    }
}

#[async_trait]
impl OrchestrationService for CodePipelineClient {
    async fn report_job_failure(
        &self,
        job_token: &str,
        message: &str,
        external_execution_id: &str,
    ) -> Result<()> {
        let details = FailureDetails::builder()
            .r#type(FailureType::JobFailed)
            .message(message)
            .external_execution_id(external_execution_id)
            .build()
            .map_err(|e| map_build_error(PUT_JOB_FAILURE_RESULT, e))?;

        self.client
            .put_job_failure_result()
            .job_id(job_token)
            .failure_details(details)
            .send()
            .await
            .map_err(|e| map_sdk_error(PUT_JOB_FAILURE_RESULT, e))?;

        Ok(())
    }

    async fn stop_execution(
        &self,
        pipeline_name: &str,
        execution_id: &str,
        reason: &str,
        abandon: bool,
    ) -> Result<()> {
        let output = self
            .client
            .stop_pipeline_execution()
            .pipeline_name(pipeline_name)
            .pipeline_execution_id(execution_id)
            .abandon(abandon)
            .reason(reason)
            .send()
            .await
            .map_err(|e| map_sdk_error(STOP_PIPELINE_EXECUTION, e))?;

        debug!(
            stopped_execution_id = output.pipeline_execution_id().unwrap_or_default(),
            "CodePipeline accepted stop request"
        );

        Ok(())
    }
}

/// Builder for a CodePipeline client that does not consult the ambient
/// AWS configuration
#[derive(Debug, Default)]
pub struct CodePipelineClientBuilder {
    endpoint_url: Option<String>,
    region: Option<String>,
    credentials: Option<(String, String)>,
    operation_timeout: Option<Duration>,
}

impl CodePipelineClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Send requests to this endpoint instead of the regional one
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sign requests with static credentials
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some((access_key_id.into(), secret_access_key.into()));
        self
    }

    /// Set the per-operation timeout
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> CodePipelineClient {
        let region = self
            .region
            .unwrap_or_else(|| FALLBACK_REGION.to_string());

        let mut config = aws_sdk_codepipeline::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .retry_config(RetryConfig::disabled());

        if let Some((access_key_id, secret_access_key)) = self.credentials {
            config = config.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "failure-notifier-static",
            ));
        }

        if let Some(endpoint_url) = self.endpoint_url {
            config = config.endpoint_url(endpoint_url);
        }

        if let Some(timeout) = self.operation_timeout {
            config = config.timeout_config(
                TimeoutConfig::builder().operation_timeout(timeout).build(),
            );
        }

        CodePipelineClient::from_client(Client::from_conf(config.build()))
    }
}
