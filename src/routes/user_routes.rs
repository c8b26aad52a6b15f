use axum::{
    extract::{Extension, Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use crate::controllers::user_controller::UserController;
use crate::dto::common::ApiResponse;
use crate::dto::user_dto::{
    ChangeRoleRequest, CreateUserRequest, DeleteUserRequest, ResetPasswordResponse, UserResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::deletion_report::DeletionReport;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/deletion-reports", get(list_deletion_reports))
        .route("/deletion-reports/:id", delete(delete_deletion_report))
        .route("/:id/role", put(change_role))
        .route("/:id/reset-password", post(reset_password))
        .route("/:id", delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.list(&actor).await?;
    Ok(Json(response))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.create(&actor, request).await?;
    Ok(Json(response))
}

async fn change_role(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.change_role(&actor, id, request).await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<DeleteUserRequest>,
) -> Result<Json<ApiResponse<DeletionReport>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.delete(&actor, id, request).await?;
    Ok(Json(response))
}

async fn reset_password(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ResetPasswordResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.reset_password(&actor, id).await?;
    Ok(Json(response))
}

async fn list_deletion_reports(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DeletionReport>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.list_deletion_reports(&actor).await?;
    Ok(Json(response))
}

async fn delete_deletion_report(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    controller.delete_deletion_report(&actor, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Reporte de auditoría eliminado"
    })))
}
