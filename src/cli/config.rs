//! Configuration file (`studymatch.json`)
//!
//! Every field is optional. A missing file means all defaults apply; a file
//! that exists must be valid JSON with valid values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;
use crate::schema::{ServerFieldPolicy, TargetPolicy, UnknownFieldPolicy, ValidationOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// "reject" or "strip" (default "reject")
    #[serde(default = "default_policy")]
    pub server_fields: String,

    /// "reject" or "strip" (default "reject")
    #[serde(default = "default_policy")]
    pub unknown_fields: String,

    /// "lenient" or "exclusive" (default "lenient")
    #[serde(default = "default_message_target")]
    pub message_target: String,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_policy() -> String {
    "reject".to_string()
}
fn default_message_target() -> String {
    "lenient".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_fields: default_policy(),
            unknown_fields: default_policy(),
            message_target: default_message_target(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.validation_options()?;
        self.log_severity()?;
        Ok(())
    }

    /// Validator options described by this config
    pub fn validation_options(&self) -> CliResult<ValidationOptions> {
        let server_fields = match self.server_fields.as_str() {
            "reject" => ServerFieldPolicy::Reject,
            "strip" => ServerFieldPolicy::Strip,
            other => return Err(invalid("server_fields", other, "'reject' or 'strip'")),
        };
        let unknown_fields = match self.unknown_fields.as_str() {
            "reject" => UnknownFieldPolicy::Reject,
            "strip" => UnknownFieldPolicy::Strip,
            other => return Err(invalid("unknown_fields", other, "'reject' or 'strip'")),
        };
        let targets = match self.message_target.as_str() {
            "lenient" => TargetPolicy::Lenient,
            "exclusive" => TargetPolicy::Exclusive,
            other => return Err(invalid("message_target", other, "'lenient' or 'exclusive'")),
        };

        Ok(ValidationOptions {
            server_fields,
            unknown_fields,
            targets,
        })
    }

    pub fn log_severity(&self) -> CliResult<Severity> {
        match self.log_level.as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(invalid(
                "log_level",
                other,
                "one of 'trace', 'info', 'warn', 'error', 'fatal'",
            )),
        }
    }
}

fn invalid(field: &str, value: &str, allowed: &str) -> CliError {
    CliError::config_error(format!(
        "Invalid {}: '{}'. Allowed: {}.",
        field, value, allowed
    ))
}
