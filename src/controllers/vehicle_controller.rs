use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::{self, Action};
use crate::utils::errors::{validation_error, AppError};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
}

/// Los campos opcionales en blanco se guardan como NULL, nunca como
/// cadena vacía
fn normalize_color(color: Option<String>) -> Option<String> {
    color.and_then(|c| {
        let trimmed = c.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        authorization_service::require(actor, Action::CreateVehicle)?;
        request.validate()?;

        let mileage = request.mileage.unwrap_or(0);
        if mileage < 0 {
            return Err(validation_error("mileage", "El kilometraje no puede ser negativo"));
        }

        // Verificar que la matrícula no exista
        if self.repository.license_plate_exists(&request.license_plate).await? {
            return Err(AppError::Conflict("La matrícula ya está registrada".to_string()));
        }

        let vehicle = self
            .repository
            .create(
                request.brand,
                request.model,
                request.year,
                request.license_plate,
                normalize_color(request.color),
                mileage,
            )
            .await?;

        log::info!("🚗 Vehículo registrado: {}", vehicle.license_plate);

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.list().await?;

        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        authorization_service::require(actor, Action::UpdateVehicle)?;
        request.validate()?;

        if let Some(mileage) = request.mileage {
            if mileage < 0 {
                return Err(validation_error("mileage", "El kilometraje no puede ser negativo"));
            }
        }

        let vehicle = self
            .repository
            .update(
                id,
                request.brand,
                request.model,
                request.year,
                request.license_plate,
                normalize_color(request.color),
                request.mileage,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        authorization_service::require(actor, Action::DeleteVehicle)?;

        self.repository.delete(id).await?;

        log::info!("🗑️ Vehículo {} eliminado por {}", id, actor.name);

        Ok(())
    }
}
