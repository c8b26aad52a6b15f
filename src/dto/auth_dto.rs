use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::dto::user_dto::UserResponse;

/// Request de login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<UserResponse>,
    pub expires_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

/// Request para cambiar la propia contraseña
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
