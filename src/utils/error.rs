use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanCheckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed template row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("Rule '{rule}' failed: {message}")]
    RuleFault { rule: String, message: String },

    #[error("Plan {plan_id} not found in course {course_id}")]
    PlanNotFound { course_id: String, plan_id: String },

    #[error("Plan {plan_id} has no structure set")]
    MissingStructureSet { plan_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Evaluation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PlanCheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlanCheckError::IoError(_) => ErrorCategory::Io,
            PlanCheckError::ConfigError { .. } | PlanCheckError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            PlanCheckError::CsvError(_)
            | PlanCheckError::SerializationError(_)
            | PlanCheckError::MalformedRow { .. }
            | PlanCheckError::PlanNotFound { .. }
            | PlanCheckError::MissingStructureSet { .. } => ErrorCategory::Input,
            PlanCheckError::RuleFault { .. } => ErrorCategory::Evaluation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Evaluation => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 行程結束代碼；警告結果另以 4 表示
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PlanCheckError::IoError(_) => "Check that the file exists and is readable",
            PlanCheckError::CsvError(_) => "Check that the template file is plain comma-separated text",
            PlanCheckError::SerializationError(_) => "Check that the snapshot file is valid JSON",
            PlanCheckError::ConfigError { .. } | PlanCheckError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            PlanCheckError::MalformedRow { .. } => {
                "Every template row needs 8 comma-separated columns"
            }
            PlanCheckError::RuleFault { .. } => {
                "The plan snapshot is incomplete; re-export it from the planning system"
            }
            PlanCheckError::PlanNotFound { .. } => "Check the course and plan ids",
            PlanCheckError::MissingStructureSet { .. } => {
                "Select a plan that has a structure set attached"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlanCheckError::MalformedRow { line, found, .. } => {
                format!("Template line {} has only {} columns", line, found)
            }
            PlanCheckError::PlanNotFound { course_id, plan_id } => {
                format!("Could not find plan '{}' in course '{}'", plan_id, course_id)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanCheckError>;
