use axum::{
    extract::{Extension, State},
    routing::post,
    Json, Router,
};
use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Rutas de autenticación que requieren sesión
pub fn create_protected_auth_router() -> Router<AppState> {
    Router::new().route("/change-password", post(change_password))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.change_password(&actor, request).await?;
    Ok(Json(response))
}
