//! Inbound build failure events
//!
//! The notifier is triggered by an EventBridge rule on "CodeBuild Build State
//! Change". Deployments normally flatten that event with an input
//! transformer into
//!
//! ```json
//! {
//!   "loglink": "https://console.aws.amazon.com/...",
//!   "environment-variables": [{"name": "executionid", "value": "..."}, ...],
//!   "exported-environment-variables": [{"name": "jobid", "value": "..."}]
//! }
//! ```
//!
//! but the untransformed event is accepted as well, see [`FailureEvent::from_value`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::VariableNames;
use crate::error::{NotifierError, Result};

/// Build status that warrants a failure report
pub const FAILED_STATUS: &str = "FAILED";

/// A name/value pair from a CodeBuild variable list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Variable {
    /// Create a named plaintext variable
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some("PLAINTEXT".to_string()),
            value: Some(value.into()),
        }
    }

    /// Create an unnamed variable, addressable only by position
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: None,
            kind: None,
            value: Some(value.into()),
        }
    }

    fn has_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .map_or(false, |n| n.eq_ignore_ascii_case(name))
    }
}

/// Payload describing a failed build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEvent {
    /// Variables exported by the build; the job token lives here
    #[serde(
        rename = "exported-environment-variables",
        alias = "exportedVariables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exported_variables: Option<Vec<Variable>>,

    /// Build environment; execution id and pipeline name live here
    #[serde(
        rename = "environment-variables",
        alias = "environmentVariables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub environment_variables: Option<Vec<Variable>>,

    /// Where the build output can be read
    #[serde(
        rename = "loglink",
        alias = "logLink",
        alias = "log-link",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub log_link: Option<String>,

    /// Build status, when the source event carried one
    #[serde(
        rename = "build-status",
        alias = "buildStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub build_status: Option<String>,
}

impl FailureEvent {
    /// Parse an invocation payload.
    ///
    /// Payloads with a `detail` object are treated as raw "CodeBuild Build
    /// State Change" events; anything else must be the flattened shape.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(NotifierError::malformed_event(
                "event",
                "payload is not a JSON object",
            ));
        }

        if value.get("detail").map_or(false, Value::is_object) {
            let raw: BuildStateChange = serde_json::from_value(value)?;
            return Ok(raw.into());
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Whether the event describes a failed build; events without a status
    /// are assumed to have been filtered upstream
    pub fn is_failed_build(&self) -> bool {
        self.build_status
            .as_deref()
            .map_or(true, |status| status.eq_ignore_ascii_case(FAILED_STATUS))
    }

    /// The CodePipeline job token, possibly empty
    pub fn job_token(&self, names: &VariableNames) -> Result<&str> {
        resolve(
            self.exported_variables.as_deref(),
            &names.job_token,
            0,
            "job token",
        )
    }

    /// The pipeline execution id
    pub fn execution_id(&self, names: &VariableNames) -> Result<&str> {
        resolve(
            self.environment_variables.as_deref(),
            &names.execution_id,
            0,
            "execution id",
        )
    }

    /// The pipeline name
    pub fn pipeline_name(&self, names: &VariableNames) -> Result<&str> {
        resolve(
            self.environment_variables.as_deref(),
            &names.pipeline_name,
            1,
            "pipeline name",
        )
    }

    /// The log link
    pub fn log_link(&self) -> Result<&str> {
        self.log_link
            .as_deref()
            .ok_or_else(|| NotifierError::malformed_event("log link", "loglink is not set"))
    }
}

/// Find a variable by name. Only an unnamed entry at the conventional
/// position stands in for a missing name.
fn resolve<'a>(
    variables: Option<&'a [Variable]>,
    name: &str,
    position: usize,
    field: &'static str,
) -> Result<&'a str> {
    let variables = variables.ok_or_else(|| {
        NotifierError::malformed_event(field, "variable list is missing")
    })?;

    let entry = match variables.iter().find(|v| v.has_name(name)) {
        Some(entry) => entry,
        None => variables
            .get(position)
            .filter(|v| v.name.is_none())
            .ok_or_else(|| {
                NotifierError::malformed_event(
                    field,
                    format!(
                        "no variable named {} and no unnamed entry at position {} ({} present)",
                        name,
                        position,
                        variables.len()
                    ),
                )
            })?,
    };

    entry.value.as_deref().ok_or_else(|| {
        NotifierError::malformed_event(field, format!("variable {} has no value", name))
    })
}

#[derive(Debug, Deserialize)]
struct BuildStateChange {
    detail: BuildDetail,
}

#[derive(Debug, Deserialize)]
struct BuildDetail {
    #[serde(rename = "build-status", default)]
    build_status: Option<String>,

    #[serde(rename = "additional-information", default)]
    additional_information: AdditionalInformation,
}

#[derive(Debug, Default, Deserialize)]
struct AdditionalInformation {
    #[serde(rename = "exported-environment-variables", default)]
    exported_environment_variables: Option<Vec<Variable>>,

    #[serde(default)]
    environment: Option<BuildEnvironment>,

    #[serde(default)]
    logs: Option<BuildLogs>,
}

#[derive(Debug, Default, Deserialize)]
struct BuildEnvironment {
    #[serde(rename = "environment-variables", default)]
    environment_variables: Option<Vec<Variable>>,
}

#[derive(Debug, Default, Deserialize)]
struct BuildLogs {
    #[serde(rename = "deep-link", default)]
    deep_link: Option<String>,
}

impl From<BuildStateChange> for FailureEvent {
    fn from(raw: BuildStateChange) -> Self {
        let info = raw.detail.additional_information;

        FailureEvent {
            exported_variables: info.exported_environment_variables,
            environment_variables: info.environment.and_then(|e| e.environment_variables),
            log_link: info.logs.and_then(|l| l.deep_link),
            build_status: raw.detail.build_status,
        }
    }
}
