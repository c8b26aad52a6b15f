use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::user::User;

/// Response de usuario (sin hash de contraseña)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Request para crear un usuario (solo admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    pub role: String,
}

/// Request para cambiar el rol de un usuario
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: String,
    /// Obligatoria cuando la operación degrada a un admin
    pub reason: Option<String>,
}

/// Request para eliminar un usuario; el motivo queda en el reporte de auditoría
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteUserRequest {
    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

/// Response del reseteo de contraseña por un admin.
/// La contraseña temporal se devuelve una única vez.
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub user_id: Uuid,
    pub temporary_password: String,
}
