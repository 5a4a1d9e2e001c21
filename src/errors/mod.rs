// Top-level error type for the web layer and the domain errors it wraps.
use axum::extract::rejection::JsonRejection;
use thiserror::Error;

pub mod credential;
pub mod ledger;
pub mod response;

pub use credential::{CredentialError, CredentialResult};
pub use ledger::{LedgerError, LedgerResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type AppResult<T> = Result<T, AppError>;
