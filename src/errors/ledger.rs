use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("{0} not specified")]
    MissingField(&'static str),

    #[error("Activity \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("Activity \"{0}\" not found")]
    NotFound(String),

    #[error("Invalid number of hours: {0}")]
    InvalidHours(f64),

    #[error("Too many activities to keep in this browser ({0} bytes); log in to store more")]
    CookieTooLarge(usize),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
