use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    // bcrypt hash, never sent over the wire
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub is_active: bool,
    #[serde(default = "default_datetime")]
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

fn default_datetime() -> DateTime<Utc> {
    Utc::now()
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password: password_hash,
            role: "user".to_string(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}
