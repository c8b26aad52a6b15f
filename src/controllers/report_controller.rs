use crate::dto::report_dto::{
    ConsumptionRow, MonthlyReportParams, MonthlyReportResponse, StreakResponse,
    WeeklyAverageResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::checklist_repository::ChecklistRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::{self, Action};
use crate::services::report_service;
use crate::utils::errors::{field_error, AppError};
use crate::utils::validation::validate_month;
use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReportController {
    checklists: ChecklistRepository,
    vehicles: VehicleRepository,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            checklists: ChecklistRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Promedio de cumplimiento de los últimos 7 días
    pub async fn weekly_average(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<WeeklyAverageResponse, AppError> {
        authorization_service::require(actor, Action::ViewReports)?;

        let checklists = self.checklists.list_all().await?;
        let today = Local::now().date_naive();

        Ok(WeeklyAverageResponse {
            average: report_service::weekly_average(&checklists, today),
        })
    }

    /// Racha de días consecutivos con al menos un checklist
    pub async fn streak(&self, actor: &AuthenticatedUser) -> Result<StreakResponse, AppError> {
        authorization_service::require(actor, Action::ViewReports)?;

        let checklists = self.checklists.list_all().await?;
        let today = Local::now().date_naive();

        Ok(StreakResponse {
            consecutive_days: report_service::consecutive_streak(&checklists, today),
        })
    }

    /// Tabla de viajes con consumo y eficiencia
    pub async fn consumption(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<ConsumptionRow>, AppError> {
        authorization_service::require(actor, Action::ViewReports)?;

        let checklists = self.checklists.list_all().await?;
        let vehicles = self.vehicles.list().await?;

        Ok(report_service::consumption_rows(&checklists, &vehicles))
    }

    /// Reporte mensual de un vehículo; la proyección imprimible la arma
    /// el cliente
    pub async fn monthly(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        params: MonthlyReportParams,
    ) -> Result<MonthlyReportResponse, AppError> {
        authorization_service::require(actor, Action::ViewReports)?;

        validate_month(params.month).map_err(|e| field_error("month", e))?;

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let (start, end) = report_service::month_bounds(params.month, params.year)?;
        let checklists = self.checklists.list_for_period(vehicle_id, start, end).await?;

        Ok(report_service::monthly_report(
            vehicle,
            params.month,
            params.year,
            &checklists,
        ))
    }
}
