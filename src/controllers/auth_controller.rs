use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::dto::common::ApiResponse;
use crate::dto::user_dto::UserResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{field_error, validation_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::validation::validate_not_empty;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;

pub struct AuthController {
    repository: UserRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            config,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        validate_not_empty(&request.name).map_err(|e| field_error("name", e))?;

        let user = self
            .repository
            .find_by_name(request.name.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !valid {
            log::warn!("⚠️ Intento de login fallido para '{}'", request.name);
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let jwt_config = JwtConfig::from(&self.config);
        let token = generate_token(user.id, &user.name, &user.role, &jwt_config)?;
        let expires_at =
            chrono::Utc::now() + chrono::Duration::seconds(jwt_config.expiration as i64);

        log::info!("🔐 Login exitoso de '{}'", user.name);

        Ok(LoginResponse {
            success: true,
            token: Some(token),
            user: Some(UserResponse::from(user)),
            expires_at: Some(expires_at),
            message: None,
        })
    }

    /// Cambio de la propia contraseña, verificando la actual
    pub async fn change_password(
        &self,
        actor: &AuthenticatedUser,
        request: ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        if request.new_password.len() < 6 {
            return Err(validation_error(
                "new_password",
                "La nueva contraseña debe tener al menos 6 caracteres",
            ));
        }

        let user = self
            .repository
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let valid = verify(&request.current_password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !valid {
            return Err(AppError::Unauthorized("La contraseña actual es incorrecta".to_string()));
        }

        let password_hash = hash(&request.new_password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        self.repository.update_password(user.id, &password_hash).await?;

        Ok(ApiResponse::success_with_message(
            (),
            "Contraseña actualizada exitosamente".to_string(),
        ))
    }
}
