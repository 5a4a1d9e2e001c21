use bcrypt::{hash, verify};
use chrono::Utc;
use std::{collections::BTreeMap, path::PathBuf, sync::Arc};
use tokio::{sync::Mutex, task};
use crate::errors::{CredentialError, CredentialResult};
use crate::models::UserRecord;
use super::json_file::{read_json_or_default, write_json_atomic};

const MAX_USERNAME_LEN: usize = 32;

type UserTable = BTreeMap<String, UserRecord>;

/// All registered users, kept in a single JSON document.
#[derive(Clone)]
pub struct CredentialStore {
    path: Arc<PathBuf>,
    bcrypt_cost: u32,
    // serializes the check-then-insert of registration
    write_lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>, bcrypt_cost: u32) -> Self {
        Self {
            path: Arc::new(path.into()),
            bcrypt_cost,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn load_all(&self) -> CredentialResult<UserTable> {
        read_json_or_default(&self.path).map_err(|e| {
            tracing::error!("Failed to read user store {}: {}", self.path.display(), e);
            CredentialError::Io(e)
        })
    }

    pub fn get(&self, username: &str) -> CredentialResult<Option<UserRecord>> {
        Ok(self.load_all()?.remove(username))
    }

    pub async fn register(&self, username: &str, password: &str) -> CredentialResult<UserRecord> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let _guard = self.write_lock.lock().await;

        let mut users = self.load_all()?;
        if users.contains_key(username) {
            tracing::info!("Registration rejected, user exists: {}", username);
            return Err(CredentialError::DuplicateUser(username.to_string()));
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = task::spawn_blocking(move || hash(password, cost)).await??;

        let record = UserRecord {
            password_hash,
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), record.clone());

        write_json_atomic(&self.path, &users).map_err(|e| {
            tracing::error!("Failed to save user store {}: {}", self.path.display(), e);
            CredentialError::Io(e)
        })?;

        tracing::info!("Registered user: {}", username);
        Ok(record)
    }

    /// Unknown users verify as `false`, the same as a wrong password.
    pub async fn verify(&self, username: &str, password: &str) -> CredentialResult<bool> {
        let Some(record) = self.get(username)? else {
            return Ok(false);
        };

        let password = password.to_string();
        let matches = task::spawn_blocking(move || verify(password, &record.password_hash)).await??;
        Ok(matches)
    }
}

/// Usernames end up in ledger file names, so only a conservative charset is allowed.
pub fn validate_username(username: &str) -> CredentialResult<()> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if username.is_empty()
        || username.len() > MAX_USERNAME_LEN
        || username.starts_with('.')
        || !valid_chars
    {
        return Err(CredentialError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("users.json"), 4)
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.register("alice", "secret").await.unwrap();
        assert!(store.get("alice").unwrap().is_some());
        assert!(store.get("bob").unwrap().is_none());
        assert!(store.verify("alice", "secret").await.unwrap());
        assert!(!store.verify("alice", "wrong").await.unwrap());
        assert!(!store.verify("bob", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        let first = store.register("alice", "secret").await.unwrap();
        let err = store.register("alice", "other").await.unwrap_err();
        assert!(matches!(err, CredentialError::DuplicateUser(name) if name == "alice"));

        // the original record is untouched
        let stored = store.get("alice").unwrap().unwrap();
        assert_eq!(stored.password_hash, first.password_hash);
        assert!(store.verify("alice", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password() {
        let dir = tempdir().unwrap();
        let err = store(&dir).register("alice", "").await.unwrap_err();
        assert!(matches!(err, CredentialError::EmptyPassword));
    }

    #[tokio::test]
    async fn test_file_layout_keys_by_username() {
        let dir = tempdir().unwrap();
        store(&dir).register("alice", "secret").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(doc["alice"]["password"].as_str().unwrap().starts_with("$2"));
        assert!(doc["alice"]["created_at"].is_string());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b-c_9").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("../etc").is_err());
        assert!(validate_username(".hidden").is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }
}
