//! Servicio de autorización
//!
//! Política única de permisos por rol. Todos los puntos de entrada
//! privilegiados pasan por `can_perform` con una acción tipada; el rol
//! del actor siempre proviene de la base de datos vía el middleware,
//! nunca del cliente.

use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{User, UserRole};
use crate::utils::errors::{validation_error, AppError};

/// Acciones privilegiadas del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateVehicle,
    UpdateVehicle,
    DeleteVehicle,
    CreateChecklist,
    RecordArrival,
    EditRefuelings,
    CorrectClosedChecklist,
    ViewReports,
    ListUsers,
    ChangeUserRole,
    DeleteUser,
    ResetUserPassword,
    ViewDeletionReports,
    DeleteDeletionReport,
}

/// Verifica si un actor puede realizar una acción
pub fn can_perform(actor: &AuthenticatedUser, action: Action) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::Collaborator => matches!(
            action,
            Action::CreateVehicle
                | Action::UpdateVehicle
                | Action::CreateChecklist
                | Action::RecordArrival
                | Action::EditRefuelings
                | Action::ViewReports
        ),
    }
}

/// Igual que `can_perform` pero devuelve Forbidden cuando no está permitido
pub fn require(actor: &AuthenticatedUser, action: Action) -> Result<(), AppError> {
    if can_perform(actor, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ))
    }
}

/// Valida un cambio de rol antes de cualquier escritura.
/// Degradar al último admin restante se rechaza; degradar a un admin
/// requiere un motivo no vacío.
pub fn check_role_change(
    actor: &AuthenticatedUser,
    target: &User,
    new_role: UserRole,
    admin_count: i64,
    reason: Option<&str>,
) -> Result<(), AppError> {
    require(actor, Action::ChangeUserRole)?;

    let demoting_admin = target.is_admin() && new_role == UserRole::Collaborator;

    if demoting_admin && admin_count <= 1 {
        return Err(AppError::Forbidden(
            "No se puede degradar al último administrador del sistema".to_string(),
        ));
    }

    if demoting_admin && reason.map_or(true, |r| r.trim().is_empty()) {
        return Err(validation_error("reason", "El motivo es obligatorio para degradar a un administrador"));
    }

    Ok(())
}

/// Valida la eliminación de un usuario antes de cualquier escritura.
/// La autoeliminación se rechaza y el motivo es obligatorio.
pub fn check_user_deletion(
    actor: &AuthenticatedUser,
    target_id: Uuid,
    reason: &str,
) -> Result<(), AppError> {
    require(actor, Action::DeleteUser)?;

    if actor.user_id == target_id {
        return Err(AppError::Forbidden(
            "Un administrador no puede eliminarse a sí mismo".to_string(),
        ));
    }

    if reason.trim().is_empty() {
        return Err(validation_error("reason", "El motivo de la eliminación es obligatorio"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn actor(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            name: "prueba".to_string(),
            role,
        }
    }

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "objetivo".to_string(),
            role: role.to_string(),
            password_hash: "$2b$12$hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_can_do_everything() {
        let admin = actor(UserRole::Admin);
        assert!(can_perform(&admin, Action::DeleteUser));
        assert!(can_perform(&admin, Action::DeleteVehicle));
        assert!(can_perform(&admin, Action::CorrectClosedChecklist));
        assert!(can_perform(&admin, Action::ViewDeletionReports));
    }

    #[test]
    fn test_collaborator_permissions() {
        let collaborator = actor(UserRole::Collaborator);
        assert!(can_perform(&collaborator, Action::CreateChecklist));
        assert!(can_perform(&collaborator, Action::EditRefuelings));
        assert!(can_perform(&collaborator, Action::ViewReports));

        assert!(!can_perform(&collaborator, Action::DeleteVehicle));
        assert!(!can_perform(&collaborator, Action::ChangeUserRole));
        assert!(!can_perform(&collaborator, Action::DeleteUser));
        assert!(!can_perform(&collaborator, Action::CorrectClosedChecklist));
        assert!(!can_perform(&collaborator, Action::ViewDeletionReports));
    }

    #[test]
    fn test_cannot_demote_last_admin() {
        let admin = actor(UserRole::Admin);
        let target = user("admin");

        let result = check_role_change(&admin, &target, UserRole::Collaborator, 1, Some("reorganización"));
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_demotion_requires_reason() {
        let admin = actor(UserRole::Admin);
        let target = user("admin");

        let result = check_role_change(&admin, &target, UserRole::Collaborator, 2, None);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = check_role_change(&admin, &target, UserRole::Collaborator, 2, Some("  "));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = check_role_change(&admin, &target, UserRole::Collaborator, 2, Some("cambio de equipo"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_promotion_does_not_require_reason() {
        let admin = actor(UserRole::Admin);
        let target = user("collaborator");

        assert!(check_role_change(&admin, &target, UserRole::Admin, 1, None).is_ok());
    }

    #[test]
    fn test_self_deletion_rejected() {
        let admin = actor(UserRole::Admin);

        let result = check_user_deletion(&admin, admin.user_id, "limpieza");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_deletion_requires_reason() {
        let admin = actor(UserRole::Admin);

        let result = check_user_deletion(&admin, Uuid::new_v4(), "   ");
        assert!(matches!(result, Err(AppError::Validation(_))));

        assert!(check_user_deletion(&admin, Uuid::new_v4(), "cuenta duplicada").is_ok());
    }

    #[test]
    fn test_collaborator_cannot_change_roles() {
        let collaborator = actor(UserRole::Collaborator);
        let target = user("collaborator");

        let result = check_role_change(&collaborator, &target, UserRole::Admin, 2, None);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
