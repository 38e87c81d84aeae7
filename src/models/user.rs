//! User request and response models.

use serde::{Deserialize, Serialize};

/// User id reported for the configured admin account
pub const ADMIN_USER_ID: i64 = 1;
/// User id reported for a newly registered account
pub const REGISTERED_USER_ID: i64 = 2;

pub const ADMIN_ROLE: &str = "admin";

/// User fragment embedded in responses. Built per response, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserView {
    pub fn new(id: i64, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

// Missing fields decode as empty strings; emptiness is checked by the handlers.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

impl RegisterRequest {
    /// True when email, password and name are all non-empty
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty() && !self.name.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserView,
}
