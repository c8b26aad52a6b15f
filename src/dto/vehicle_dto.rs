use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::vehicle::Vehicle;

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2035))]
    pub year: i32,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: String,

    pub color: Option<String>,

    /// Kilometraje inicial; si se omite arranca en 0
    pub mileage: Option<i64>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2035))]
    pub year: Option<i32>,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: Option<String>,

    pub color: Option<String>,

    /// Puede fijarse por debajo del valor actual como corrección explícita
    pub mileage: Option<i64>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: Option<String>,
    pub mileage: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            license_plate: vehicle.license_plate,
            color: vehicle.color,
            mileage: vehicle.mileage,
            created_at: vehicle.created_at,
        }
    }
}
