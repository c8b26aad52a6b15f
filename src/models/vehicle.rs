//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus helpers.
//! Mapea exactamente a la tabla vehicles con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: Option<String>,
    /// Último kilometraje conocido del odómetro. Se actualiza únicamente
    /// como efecto de guardar una salida o una llegada de checklist.
    pub mileage: i64,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Etiqueta legible para listados y reportes
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.license_plate)
    }

    /// Descripción usada como contexto para el servicio de diagnóstico
    pub fn description(&self) -> String {
        format!("{} {} {} - matrícula {}", self.brand, self.model, self.year, self.license_plate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vehicle() -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            brand: "Toyota".to_string(),
            model: "Hilux".to_string(),
            year: 2021,
            license_plate: "ABC-1234".to_string(),
            color: Some("blanco".to_string()),
            mileage: 52_300,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_vehicle_label() {
        let vehicle = sample_vehicle();
        assert_eq!(vehicle.label(), "Toyota Hilux (ABC-1234)");
    }

    #[test]
    fn test_vehicle_description_includes_year() {
        let vehicle = sample_vehicle();
        assert!(vehicle.description().contains("2021"));
        assert!(vehicle.description().contains("ABC-1234"));
    }
}
