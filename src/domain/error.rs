use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    ParseError(String),
    ConfigError(String),
    DatabaseError(String),
    IoError(String),
    /// A CSV row collided with a declared unique key during ingestion.
    /// `row` is 1-based and counts data rows only.
    ConstraintViolation {
        table: String,
        row: u64,
        message: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::ConstraintViolation {
                table,
                row,
                message,
            } => write!(
                f,
                "Constraint violation in {} at CSV row {}: {}",
                table, row, message
            ),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
