use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("User {0} already exists")]
    DuplicateUser(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt user store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type CredentialResult<T> = Result<T, CredentialError>;
