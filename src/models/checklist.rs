//! Modelo de DailyChecklist
//!
//! Un registro por viaje de vehículo: inspección de salida, llegada opcional
//! y repostajes embebidos. Los valores crudos de inspección se guardan en un
//! único mapa `items`; la clasificación ok/problema se deriva bajo demanda
//! a través del catálogo.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

/// Estados del ciclo de vida de un checklist
///
/// Transiciones válidas: pending_arrival -> completed | problem.
/// Un checklist cerrado nunca cambia de estado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecklistStatus {
    PendingArrival,
    Completed,
    Problem,
}

impl ChecklistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistStatus::PendingArrival => "pending_arrival",
            ChecklistStatus::Completed => "completed",
            ChecklistStatus::Problem => "problem",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending_arrival" => Some(ChecklistStatus::PendingArrival),
            "completed" => Some(ChecklistStatus::Completed),
            "problem" => Some(ChecklistStatus::Problem),
            _ => None,
        }
    }

    /// Un checklist cerrado (completed o problem) ya no transiciona
    pub fn is_closed(&self) -> bool {
        matches!(self, ChecklistStatus::Completed | ChecklistStatus::Problem)
    }
}

/// Tipo de combustible de un repostaje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasolina,
    Diesel,
}

/// Un evento de repostaje embebido en un checklist.
/// `amount` es el total pagado (precio por litro x litros, calculado al
/// ingresar el dato); el precio por litro no se persiste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refueling {
    pub amount: Decimal,
    pub liters: Decimal,
    #[serde(rename = "type")]
    pub fuel_type: FuelType,
}

/// DailyChecklist - mapea exactamente a la tabla checklists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyChecklist {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub driver_name: String,
    pub departure_timestamp: DateTime<Utc>,
    pub arrival_timestamp: Option<DateTime<Utc>>,
    pub departure_mileage: i64,
    pub arrival_mileage: Option<i64>,
    /// Mapa clave de ítem -> valor crudo elegido en la inspección
    pub items: Json<HashMap<String, String>>,
    pub notes: Option<String>,
    pub status: String,
    /// Día calendario de la salida; se fija al crear y nunca se recalcula
    pub date: NaiveDate,
    pub ai_diagnosis: Option<String>,
    pub refuelings: Json<Vec<Refueling>>,
}

impl DailyChecklist {
    pub fn status(&self) -> Option<ChecklistStatus> {
        ChecklistStatus::from_str(&self.status)
    }

    pub fn is_closed(&self) -> bool {
        self.status().map_or(false, |s| s.is_closed())
    }

    /// Distancia recorrida del viaje, solo cuando ambos kilometrajes existen
    pub fn distance(&self) -> Option<i64> {
        self.arrival_mileage.map(|arrival| arrival - self.departure_mileage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ChecklistStatus::PendingArrival,
            ChecklistStatus::Completed,
            ChecklistStatus::Problem,
        ] {
            assert_eq!(ChecklistStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ChecklistStatus::from_str("cerrado"), None);
    }

    #[test]
    fn test_closed_states() {
        assert!(!ChecklistStatus::PendingArrival.is_closed());
        assert!(ChecklistStatus::Completed.is_closed());
        assert!(ChecklistStatus::Problem.is_closed());
    }

    #[test]
    fn test_refueling_serde_round_trip() {
        let refueling = Refueling {
            amount: dec("350.50"),
            liters: dec("41.2"),
            fuel_type: FuelType::Gasolina,
        };

        let json = serde_json::to_string(&refueling).unwrap();
        assert!(json.contains("\"type\":\"gasolina\""));

        let back: Refueling = serde_json::from_str(&json).unwrap();
        assert_eq!(back, refueling);
    }

    #[test]
    fn test_distance_requires_arrival() {
        let mut checklist = DailyChecklist {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            driver_id: None,
            driver_name: "Pedro".to_string(),
            departure_timestamp: Utc::now(),
            arrival_timestamp: None,
            departure_mileage: 1000,
            arrival_mileage: None,
            items: Json(HashMap::new()),
            notes: None,
            status: "pending_arrival".to_string(),
            date: Utc::now().date_naive(),
            ai_diagnosis: None,
            refuelings: Json(vec![]),
        };

        assert_eq!(checklist.distance(), None);

        checklist.arrival_mileage = Some(1120);
        assert_eq!(checklist.distance(), Some(120));
    }
}
