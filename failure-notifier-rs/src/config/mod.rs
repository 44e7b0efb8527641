//! Configuration management for the failure notifier
//!
//! Values come from a [`ConfigProvider`]: environment variables in the
//! deployed function, an in-memory map in tests.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NotifierError, Result};

/// Prefix for all environment variables read by the binary
pub const ENV_PREFIX: &str = "FAILURE_NOTIFIER";

/// Message sent upstream when a build fails
pub const DEFAULT_FAILURE_MESSAGE: &str = "CodeBuild process failed";

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an optional string value, treating blank values as unset
    fn get_optional(&self, key: &str) -> Option<String> {
        self.get_string(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get an unsigned integer configuration value
    fn get_u64(&self, key: &str) -> Result<u64> {
        let value = self.get_string(key)?;
        value.trim().parse::<u64>().map_err(|e| {
            NotifierError::configuration(format!("Invalid integer for key {}: {}", key, e))
        })
    }

    /// Get a boolean configuration value
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(NotifierError::configuration(format!(
                "Invalid boolean value for key {}: {}",
                key, value
            ))),
        }
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub(crate) fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                NotifierError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => NotifierError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values.get(key).cloned().ok_or_else(|| {
            NotifierError::configuration(format!("Configuration key not found: {}", key))
        })
    }
}

/// Names under which the notifier looks up event variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableNames {
    /// Exported variable carrying the CodePipeline job token
    pub job_token: String,

    /// Environment variable carrying the pipeline execution id
    pub execution_id: String,

    /// Environment variable carrying the pipeline name
    pub pipeline_name: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            job_token: "jobid".to_string(),
            execution_id: "executionid".to_string(),
            pipeline_name: "pipelinename".to_string(),
        }
    }
}

/// Configuration for the failure notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Message (or stop reason) reported to CodePipeline
    pub failure_message: String,

    /// Event variable names
    pub variables: VariableNames,

    /// CodePipeline endpoint override
    pub endpoint_url: Option<String>,

    /// AWS region override; the ambient region is used when unset
    pub region: Option<String>,

    /// Upper bound for a single CodePipeline call
    pub operation_timeout_seconds: Option<u64>,

    /// Log reports instead of sending them
    pub dry_run: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            variables: VariableNames::default(),
            endpoint_url: None,
            region: None,
            operation_timeout_seconds: None,
            dry_run: false,
        }
    }
}

impl NotifierConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = VariableNames::default();

        let operation_timeout_seconds = match provider.get_optional("operation_timeout_seconds") {
            Some(_) => Some(provider.get_u64("operation_timeout_seconds")?),
            None => None,
        };

        let dry_run = match provider.get_optional("dry_run") {
            Some(_) => provider.get_bool("dry_run")?,
            None => false,
        };

        let config = Self {
            failure_message: provider.get_string_or("failure_message", DEFAULT_FAILURE_MESSAGE),
            variables: VariableNames {
                job_token: provider.get_string_or("job_token_variable", &defaults.job_token),
                execution_id: provider.get_string_or("execution_id_variable", &defaults.execution_id),
                pipeline_name: provider.get_string_or("pipeline_name_variable", &defaults.pipeline_name),
            },
            endpoint_url: provider.get_optional("endpoint_url"),
            region: provider.get_optional("region"),
            operation_timeout_seconds,
            dry_run,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `FAILURE_NOTIFIER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&EnvConfigProvider::new().with_prefix(ENV_PREFIX))
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        if self.failure_message.trim().is_empty() {
            return Err(NotifierError::configuration("Failure message must not be empty"));
        }

        for (key, name) in [
            ("job_token_variable", &self.variables.job_token),
            ("execution_id_variable", &self.variables.execution_id),
            ("pipeline_name_variable", &self.variables.pipeline_name),
        ] {
            if name.trim().is_empty() {
                return Err(NotifierError::configuration(format!("{} must not be empty", key)));
            }
        }

        if self.operation_timeout_seconds == Some(0) {
            return Err(NotifierError::configuration(
                "operation_timeout_seconds must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Operation timeout as a Duration
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_seconds.map(Duration::from_secs)
    }
}
