use crate::dto::checklist_dto::{
    ArrivalRequest, CatalogItemResponse, ChecklistFilters, ChecklistResponse,
    CreateChecklistRequest, RefuelingInput,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::checklist::Refueling;
use crate::repositories::checklist_repository::ChecklistRepository;
use crate::services::checklist_service::ChecklistService;
use crate::state::AppState;
use crate::utils::errors::{field_error, AppError};
use crate::utils::validation::{validate_non_negative, validate_positive};
use uuid::Uuid;

pub struct ChecklistController {
    service: ChecklistService,
    repository: ChecklistRepository,
}

impl ChecklistController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: ChecklistService::new(state.pool.clone(), &state.config, state.diagnosis.clone()),
            repository: ChecklistRepository::new(state.pool.clone()),
        }
    }

    /// Catálogo estático de ítems inspeccionables, para armar el formulario
    pub fn catalog(&self) -> Vec<CatalogItemResponse> {
        crate::models::catalog::items()
            .iter()
            .map(CatalogItemResponse::from)
            .collect()
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateChecklistRequest,
    ) -> Result<ApiResponse<ChecklistResponse>, AppError> {
        let checklist = self.service.create_departure(actor, request).await?;

        Ok(ApiResponse::success_with_message(
            ChecklistResponse::from(checklist),
            "Salida registrada exitosamente".to_string(),
        ))
    }

    pub async fn record_arrival(
        &self,
        actor: &AuthenticatedUser,
        checklist_id: Uuid,
        request: ArrivalRequest,
    ) -> Result<ApiResponse<ChecklistResponse>, AppError> {
        let arrival_mileage = request.arrival_mileage;
        let refuelings = convert_refuelings(request.refuelings)?;

        let checklist = self
            .service
            .record_arrival(actor, checklist_id, arrival_mileage, refuelings)
            .await?;

        Ok(ApiResponse::success_with_message(
            ChecklistResponse::from(checklist),
            "Llegada registrada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ChecklistResponse, AppError> {
        let checklist = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Checklist no encontrado".to_string()))?;

        Ok(ChecklistResponse::from(checklist))
    }

    pub async fn list(&self, filters: ChecklistFilters) -> Result<Vec<ChecklistResponse>, AppError> {
        let checklists = match filters.vehicle_id {
            Some(vehicle_id) => self.repository.list_by_vehicle(vehicle_id).await?,
            None => self.repository.list_all().await?,
        };

        Ok(checklists.into_iter().map(ChecklistResponse::from).collect())
    }
}

/// Valida los repostajes y calcula el total pagado de cada uno
fn convert_refuelings(inputs: Vec<RefuelingInput>) -> Result<Vec<Refueling>, AppError> {
    let mut refuelings = Vec::with_capacity(inputs.len());

    for input in inputs {
        validate_positive(input.liters).map_err(|e| field_error("refuelings", e))?;
        validate_non_negative(input.price_per_liter).map_err(|e| field_error("refuelings", e))?;
        refuelings.push(input.into_refueling());
    }

    Ok(refuelings)
}
