use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use crate::controllers::checklist_controller::ChecklistController;
use crate::dto::checklist_dto::{
    ArrivalRequest, CatalogItemResponse, ChecklistFilters, ChecklistResponse,
    CreateChecklistRequest,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_checklist_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_checklist))
        .route("/", get(list_checklists))
        .route("/catalog", get(get_catalog))
        .route("/:id", get(get_checklist))
        .route("/:id/arrival", put(record_arrival))
}

async fn get_catalog(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogItemResponse>>, AppError> {
    let controller = ChecklistController::new(&state);
    Ok(Json(controller.catalog()))
}

async fn create_checklist(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateChecklistRequest>,
) -> Result<Json<ApiResponse<ChecklistResponse>>, AppError> {
    let controller = ChecklistController::new(&state);
    let response = controller.create(&actor, request).await?;
    Ok(Json(response))
}

async fn list_checklists(
    State(state): State<AppState>,
    Query(filters): Query<ChecklistFilters>,
) -> Result<Json<Vec<ChecklistResponse>>, AppError> {
    let controller = ChecklistController::new(&state);
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn get_checklist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChecklistResponse>, AppError> {
    let controller = ChecklistController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn record_arrival(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ArrivalRequest>,
) -> Result<Json<ApiResponse<ChecklistResponse>>, AppError> {
    let controller = ChecklistController::new(&state);
    let response = controller.record_arrival(&actor, id, request).await?;
    Ok(Json(response))
}
