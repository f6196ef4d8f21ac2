use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Trace parse error at line {line}: {message}")]
    TraceParseError { line: usize, message: String },

    #[error("Replay failed during {stage}: {details}")]
    ReplayError { stage: String, details: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Config,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GuardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GuardError::ZipError(_) | GuardError::IoError(_) => ErrorCategory::Io,
            GuardError::CsvError(_)
            | GuardError::SerializationError(_)
            | GuardError::TraceParseError { .. } => ErrorCategory::Data,
            GuardError::ConfigError { .. }
            | GuardError::ValidationError { .. }
            | GuardError::InvalidConfigValueError { .. }
            | GuardError::MissingConfigError { .. }
            | GuardError::ConfigValidationError { .. } => ErrorCategory::Config,
            GuardError::ReplayError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GuardError::ZipError(_) | GuardError::IoError(_) => ErrorSeverity::Critical,
            GuardError::CsvError(_)
            | GuardError::SerializationError(_)
            | GuardError::TraceParseError { .. }
            | GuardError::ReplayError { .. } => ErrorSeverity::High,
            GuardError::ConfigError { .. }
            | GuardError::ValidationError { .. }
            | GuardError::InvalidConfigValueError { .. }
            | GuardError::MissingConfigError { .. }
            | GuardError::ConfigValidationError { .. } => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GuardError::ZipError(_) => {
                "Check that the output directory is writable and has free space".to_string()
            }
            GuardError::CsvError(_) => {
                "The audit rows could not be rendered; re-run with --verbose for details"
                    .to_string()
            }
            GuardError::IoError(_) => {
                "Check that the trace file exists and the output path is writable".to_string()
            }
            GuardError::SerializationError(_) => {
                "The report data could not be serialized; re-run with --verbose for details"
                    .to_string()
            }
            GuardError::TraceParseError { line, .. } => format!(
                "Fix line {} of the trace file (expected one JSON record per line)",
                line
            ),
            GuardError::ReplayError { stage, .. } => format!(
                "Inspect the trace contents and retry the {} phase",
                stage
            ),
            GuardError::ConfigError { .. }
            | GuardError::ValidationError { .. }
            | GuardError::ConfigValidationError { .. } => {
                "Fix the configuration and run again".to_string()
            }
            GuardError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' and run again", field)
            }
            GuardError::MissingConfigError { field } => {
                format!("Provide a value for '{}' and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GuardError::ZipError(_) => "Could not build the report bundle".to_string(),
            GuardError::CsvError(_) => "Could not render the audit report".to_string(),
            GuardError::IoError(e) => format!("File access failed: {}", e),
            GuardError::SerializationError(_) => "Could not serialize the report".to_string(),
            GuardError::TraceParseError { line, message } => {
                format!("The event trace is malformed (line {}): {}", line, message)
            }
            GuardError::ReplayError { details, .. } => {
                format!("Replay aborted: {}", details)
            }
            GuardError::ConfigError { message }
            | GuardError::ValidationError { message } => message.clone(),
            GuardError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {}: {}", value, field, reason),
            GuardError::MissingConfigError { field } => {
                format!("The required setting '{}' is missing", field)
            }
            GuardError::ConfigValidationError { field, message } => {
                format!("{}: {}", field, message)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
