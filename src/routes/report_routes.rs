use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};
use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{
    ConsumptionRow, MonthlyReportParams, MonthlyReportResponse, StreakResponse,
    WeeklyAverageResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/weekly-average", get(weekly_average))
        .route("/streak", get(streak))
        .route("/consumption", get(consumption))
        .route("/monthly/:vehicle_id", get(monthly))
}

async fn weekly_average(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<WeeklyAverageResponse>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.weekly_average(&actor).await?;
    Ok(Json(response))
}

async fn streak(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<StreakResponse>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.streak(&actor).await?;
    Ok(Json(response))
}

async fn consumption(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ConsumptionRow>>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.consumption(&actor).await?;
    Ok(Json(response))
}

async fn monthly(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
    Query(params): Query<MonthlyReportParams>,
) -> Result<Json<MonthlyReportResponse>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.monthly(&actor, vehicle_id, params).await?;
    Ok(Json(response))
}
