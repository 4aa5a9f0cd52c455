use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Numerical error: {message}")]
    NumericsError { message: String },

    #[error("Simulation error: {message}")]
    SimulationError { message: String },

    #[error("Report generation error: {message}")]
    ReportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Numerics,
    Simulation,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LabError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
            Self::NumericsError { .. } => ErrorCategory::Numerics,
            Self::SimulationError { .. } => ErrorCategory::Simulation,
            Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ReportError { .. } => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Medium,
            Self::NumericsError { .. } | Self::SimulationError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ReportError { .. } => {
                ErrorSeverity::High
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError {
                field,
                value,
                reason,
            } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("The configuration field '{}' is required but missing", field)
            }
            Self::NumericsError { message } => format!("A numerical step failed: {}", message),
            Self::SimulationError { message } => {
                format!("The simulation could not complete: {}", message)
            }
            Self::ReportError { message } => {
                format!("The results could not be written: {}", message)
            }
            Self::CsvError(e) => format!("CSV output failed: {}", e),
            Self::IoError(e) => format!("File system operation failed: {}", e),
            Self::SerializationError(e) => format!("JSON output failed: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Config => {
                "Check the CLI flags or TOML file against the documented parameters".to_string()
            }
            ErrorCategory::Numerics => {
                "Check that market inputs are in range (positive vols/tenors, |rho| < 1, increasing strikes)"
                    .to_string()
            }
            ErrorCategory::Simulation => {
                "Reduce the run or worker count and retry with --verbose for details".to_string()
            }
            ErrorCategory::Io => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_medium_severity() {
        let err = LabError::MissingConfigError {
            field: "simulation.runs".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_user_friendly_message_names_the_field() {
        let err = LabError::InvalidConfigValueError {
            field: "factor.rho".to_string(),
            value: "1.5".to_string(),
            reason: "correlation must be in (-1, 1)".to_string(),
        };
        assert!(err.user_friendly_message().contains("factor.rho"));
    }
}
