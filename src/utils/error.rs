use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {message}")]
    TomlError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid participant roster: {message}")]
    RosterError { message: String },

    #[error("Invalid assignment: {message}")]
    AssignmentError { message: String },

    #[error("Failed to build message for {recipient}: {message}")]
    RenderError { recipient: String, message: String },

    #[error("Mail transport setup failed: {message}")]
    TransportSetupError { message: String },

    #[error("Failed to deliver notification to {recipient}: {message}")]
    TransportError { recipient: String, message: String },

    #[error("Delivery incomplete: {failed} failed, {delivered} delivered")]
    DeliveryError { failed: usize, delivered: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Matching,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::IoError(_)
            | SantaError::JsonError(_)
            | SantaError::YamlError(_)
            | SantaError::CsvError(_)
            | SantaError::RosterError { .. } => ErrorCategory::Input,
            SantaError::TomlError { .. }
            | SantaError::MissingConfigError { .. }
            | SantaError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SantaError::AssignmentError { .. } => ErrorCategory::Matching,
            SantaError::RenderError { .. }
            | SantaError::TransportSetupError { .. }
            | SantaError::TransportError { .. }
            | SantaError::DeliveryError { .. } => ErrorCategory::Delivery,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SantaError::TransportError { .. } | SantaError::DeliveryError { .. } => {
                ErrorSeverity::Medium
            }
            SantaError::IoError(_)
            | SantaError::JsonError(_)
            | SantaError::YamlError(_)
            | SantaError::CsvError(_)
            | SantaError::RosterError { .. }
            | SantaError::RenderError { .. } => ErrorSeverity::High,
            SantaError::AssignmentError { .. }
            | SantaError::TomlError { .. }
            | SantaError::MissingConfigError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::TransportSetupError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SantaError::IoError(_) => "Check that the file exists and is readable".to_string(),
            SantaError::JsonError(_) | SantaError::YamlError(_) | SantaError::CsvError(_) => {
                "Check the participant file against the documented layout (name, email, exclusions)"
                    .to_string()
            }
            SantaError::TomlError { .. } => {
                "Check the configuration file for TOML syntax errors".to_string()
            }
            SantaError::MissingConfigError { field } => {
                format!("Set {} in the environment or the configuration file", field)
            }
            SantaError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of {}", field)
            }
            SantaError::RosterError { .. } => {
                "Fix the participant list: names must be unique and every entry needs an email"
                    .to_string()
            }
            SantaError::AssignmentError { .. } => {
                "Re-run the matcher; a computed assignment failed verification".to_string()
            }
            SantaError::RenderError { .. } => {
                "Check the sender, reply-to and participant email addresses".to_string()
            }
            SantaError::TransportSetupError { .. } => {
                "Check SMTP host, port and credentials (app passwords are often required)"
                    .to_string()
            }
            SantaError::TransportError { .. } | SantaError::DeliveryError { .. } => {
                "Review the log for undelivered recipients and notify them manually".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the participant list: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Matching => format!("Matching failed: {}", self),
            ErrorCategory::Delivery => format!("Sending notifications failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
