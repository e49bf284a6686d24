use crate::domain::model::HookPhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to launch '{command}': {message}")]
    LaunchError { command: String, message: String },

    #[error("Behavior '{behavior}' aborted {phase}: {reason}")]
    BehaviorAborted {
        behavior: String,
        phase: HookPhase,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    System,
    Behavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RepoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RepoError::ConfigValidationError { .. }
            | RepoError::MissingConfigError { .. }
            | RepoError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RepoError::IoError(_)
            | RepoError::SerializationError(_)
            | RepoError::LaunchError { .. } => ErrorCategory::System,
            RepoError::BehaviorAborted { .. } => ErrorCategory::Behavior,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RepoError::SerializationError(_) => ErrorSeverity::Medium,
            RepoError::ConfigValidationError { .. }
            | RepoError::MissingConfigError { .. }
            | RepoError::InvalidConfigValueError { .. }
            | RepoError::BehaviorAborted { .. } => ErrorSeverity::High,
            RepoError::IoError(_) | RepoError::LaunchError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RepoError::IoError(_) => {
                "Check that the workspace and input files exist and are accessible".to_string()
            }
            RepoError::SerializationError(_) => {
                "Make sure the revision snapshot files contain valid JSON".to_string()
            }
            RepoError::ConfigValidationError { .. } => {
                "Review the behaviors configuration file for syntax errors".to_string()
            }
            RepoError::MissingConfigError { field } => {
                format!("Add the '{}' setting to the configuration", field)
            }
            RepoError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration", field)
            }
            RepoError::LaunchError { command, .. } => {
                format!("Verify that '{}' is installed and on the PATH", command)
            }
            RepoError::BehaviorAborted { behavior, .. } => format!(
                "Fix the condition reported by '{}' or disable that behavior",
                behavior
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RepoError::BehaviorAborted {
                behavior, reason, ..
            } => format!("{} needs your attention: {}", behavior, reason),
            RepoError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            other => other.to_string(),
        }
    }

    /// Process exit code for the CLI, derived from severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoError>;
