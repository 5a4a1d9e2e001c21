use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

// One entry of users.json, keyed by username
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(rename = "password")]
    pub password_hash: String,  // bcrypt hash, never the plain password
    pub created_at: DateTime<Utc>,
}
