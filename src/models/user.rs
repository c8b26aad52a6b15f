//! Modelo de User
//!
//! Usuarios de la aplicación con sus roles. El rol se persiste como texto
//! y se interpreta con el enum UserRole.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Collaborator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Collaborator => "collaborator",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "collaborator" => Some(UserRole::Collaborator),
            _ => None,
        }
    }
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }
}
