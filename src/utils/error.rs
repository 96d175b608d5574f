use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Schema violation at byte {position}: {message}")]
    SchemaViolation { message: String, position: usize },

    #[error("Invalid xs:{xsd_type} value '{value}' in <{element}>: {reason}")]
    LexicalError {
        element: String,
        xsd_type: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Schema,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BindError {
    pub fn schema_violation(message: impl Into<String>, position: usize) -> Self {
        BindError::SchemaViolation {
            message: message.into(),
            position,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BindError::XmlError(_)
            | BindError::SerializationError(_)
            | BindError::LexicalError { .. } => ErrorCategory::Parse,
            BindError::SchemaViolation { .. } => ErrorCategory::Schema,
            BindError::IoError(_) => ErrorCategory::Io,
            BindError::ConfigError { .. }
            | BindError::ConfigValidationError { .. }
            | BindError::InvalidConfigValueError { .. }
            | BindError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Parse | ErrorCategory::Schema => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BindError::XmlError(_) => "Check that the input is well-formed XML",
            BindError::SerializationError(_) => {
                "Check that the JSON input contains order_item_id and qty for every item"
            }
            BindError::SchemaViolation { .. } => {
                "Make sure <order_item_id> precedes <qty>, both are present, or pass --ignore-unknown for extra elements"
            }
            BindError::LexicalError { .. } => {
                "order_item_id must be a 32-bit integer and qty an xs:double (e.g. 3.5, 1E3, INF, NaN)"
            }
            BindError::IoError(_) => "Verify the input file exists and the output path is writable",
            BindError::ConfigError { .. }
            | BindError::ConfigValidationError { .. }
            | BindError::InvalidConfigValueError { .. }
            | BindError::MissingConfigError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Parse => format!("Could not parse the input: {}", self),
            ErrorCategory::Schema => format!("Input does not match the orderItemIdQty schema: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BindError>;
