//! Deployment environment and logging configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variables consulted, in order, to detect the environment
const ENVIRONMENT_VARS: [&str; 2] = ["MAILCODE_ENV", "ENVIRONMENT"];

/// Where the pipeline is deployed
///
/// Only development may run without a real email provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }

    /// Detect from `MAILCODE_ENV` or `ENVIRONMENT`; unknown values mean development
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Optional TOML overrides, e.g. `config.production.toml`
    pub fn config_file(&self) -> String {
        format!("config.{}.toml", self.as_str())
    }

    /// Optional dotenv file, e.g. `.env.production`
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Level or filter directives, e.g. `info,mc_infra=debug`
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colours; ignored for JSON output
    #[serde(default)]
    pub colored: bool,

    /// Attach file and line to each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Verbose human-readable output in development, JSON elsewhere
    ///
    /// Production logs at `info` so delivery outcomes stay visible.
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_development() {
            return Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            };
        }

        Self {
            level: String::from("info"),
            format: LogFormat::Json,
            colored: false,
            source_location: false,
        }
    }
}
