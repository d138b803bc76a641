//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff account (admin console user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Staff info returned to clients (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInfo {
    pub id: i64,
    pub username: String,
}

impl From<&Staff> for StaffInfo {
    fn from(s: &Staff) -> Self {
        Self {
            id: s.id,
            username: s.username.clone(),
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffInfo,
}
