use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("No candidates left to draw from")]
    NoCandidates,

    #[error("Cannot finalize a group with no drawn members")]
    EmptyDrawBuffer,

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("Group not found: {id}")]
    GroupNotFound { id: String },

    #[error("Student not found: {id}")]
    StudentNotFound { id: String },

    #[error("Student already exists: {name}")]
    DuplicateStudent { name: String },

    #[error("Invalid student record: {message}")]
    InvalidStudent { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Draw,
    Roster,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GroupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GroupError::NoCandidates
            | GroupError::EmptyDrawBuffer
            | GroupError::DrawInProgress
            | GroupError::GroupNotFound { .. } => ErrorCategory::Draw,
            GroupError::StudentNotFound { .. }
            | GroupError::DuplicateStudent { .. }
            | GroupError::InvalidStudent { .. }
            | GroupError::CsvError(_) => ErrorCategory::Roster,
            GroupError::IoError(_) | GroupError::SerializationError(_) => ErrorCategory::Storage,
            GroupError::ConfigError { .. }
            | GroupError::ConfigValidationError { .. }
            | GroupError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Precondition violations: the caller should have disabled the action.
            ErrorCategory::Draw => ErrorSeverity::Low,
            ErrorCategory::Roster => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GroupError::NoCandidates => "Every student is already in a group; delete a group to draw again",
            GroupError::EmptyDrawBuffer => "Draw at least one student before finalizing",
            GroupError::DrawInProgress => "Wait for the current draw to finish",
            GroupError::GroupNotFound { .. } => "Run `groups list` to see existing group ids",
            GroupError::StudentNotFound { .. } => "Run `roster list` to see student ids",
            GroupError::DuplicateStudent { .. } => "Use a different name or rename the existing student",
            GroupError::InvalidStudent { .. } => "Check the student's name and role",
            GroupError::CsvError(_) => "Check that the CSV has a `name,role` header",
            GroupError::IoError(_) => "Check that the state file path exists and is writable",
            GroupError::SerializationError(_) => "The state file is corrupted; restore it from a backup or remove it",
            GroupError::ConfigError { .. }
            | GroupError::ConfigValidationError { .. }
            | GroupError::InvalidConfigValueError { .. } => "Review the TOML configuration file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Draw => format!("Draw rejected: {}", self),
            ErrorCategory::Roster => format!("Roster problem: {}", self),
            ErrorCategory::Storage => format!("Could not read or write class data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GroupError>;
