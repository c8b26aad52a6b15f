use crate::dto::common::ApiResponse;
use crate::dto::user_dto::{
    ChangeRoleRequest, CreateUserRequest, DeleteUserRequest, ResetPasswordResponse, UserResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::deletion_report::DeletionReport;
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::services::authorization_service::{self, Action};
use crate::utils::errors::AppError;
use bcrypt::{hash, DEFAULT_COST};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<UserResponse>, AppError> {
        authorization_service::require(actor, Action::ListUsers)?;

        let users = self.repository.list().await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        authorization_service::require(actor, Action::ListUsers)?;
        request.validate()?;

        let role = UserRole::from_str(&request.role)
            .ok_or_else(|| AppError::BadRequest(format!("Rol inválido: '{}'", request.role)))?;

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .repository
            .create(request.name.trim().to_string(), role.as_str(), password_hash)
            .await?;

        log::info!("👤 Usuario '{}' creado por {}", user.name, actor.name);

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario creado exitosamente".to_string(),
        ))
    }

    pub async fn change_role(
        &self,
        actor: &AuthenticatedUser,
        target_id: Uuid,
        request: ChangeRoleRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let new_role = UserRole::from_str(&request.role)
            .ok_or_else(|| AppError::BadRequest(format!("Rol inválido: '{}'", request.role)))?;

        let target = self
            .repository
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let admin_count = self.repository.count_admins().await?;

        // Toda la política se evalúa antes de escribir
        authorization_service::check_role_change(
            actor,
            &target,
            new_role,
            admin_count,
            request.reason.as_deref(),
        )?;

        let user = self.repository.update_role(target_id, new_role.as_str()).await?;

        log::info!(
            "🔁 Rol de '{}' cambiado a {} por {}",
            user.name,
            user.role,
            actor.name
        );

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Rol actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(
        &self,
        actor: &AuthenticatedUser,
        target_id: Uuid,
        request: DeleteUserRequest,
    ) -> Result<ApiResponse<DeletionReport>, AppError> {
        request.validate()?;
        authorization_service::check_user_deletion(actor, target_id, &request.reason)?;

        let target = self
            .repository
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        // Eliminación + reporte de auditoría: todo o nada
        let report = self
            .repository
            .delete_with_report(&target, actor.user_id, &actor.name, request.reason.trim())
            .await?;

        log::info!("🗑️ Usuario '{}' eliminado por {}", target.name, actor.name);

        Ok(ApiResponse::success_with_message(
            report,
            "Usuario eliminado y reporte de auditoría creado".to_string(),
        ))
    }

    pub async fn reset_password(
        &self,
        actor: &AuthenticatedUser,
        target_id: Uuid,
    ) -> Result<ApiResponse<ResetPasswordResponse>, AppError> {
        authorization_service::require(actor, Action::ResetUserPassword)?;

        let target = self
            .repository
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let temporary_password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();

        let password_hash = hash(&temporary_password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        self.repository.update_password(target.id, &password_hash).await?;

        log::info!("🔑 Contraseña de '{}' reseteada por {}", target.name, actor.name);

        Ok(ApiResponse::success_with_message(
            ResetPasswordResponse {
                user_id: target.id,
                temporary_password,
            },
            "Contraseña temporal generada; se muestra una única vez".to_string(),
        ))
    }

    pub async fn list_deletion_reports(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<DeletionReport>, AppError> {
        authorization_service::require(actor, Action::ViewDeletionReports)?;

        self.repository.list_deletion_reports().await
    }

    pub async fn delete_deletion_report(
        &self,
        actor: &AuthenticatedUser,
        report_id: Uuid,
    ) -> Result<(), AppError> {
        authorization_service::require(actor, Action::DeleteDeletionReport)?;

        self.repository.delete_deletion_report(report_id).await
    }
}
