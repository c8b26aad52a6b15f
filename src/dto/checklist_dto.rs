use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::catalog::ChecklistItem;
use crate::models::checklist::{DailyChecklist, FuelType, Refueling};
use crate::services::fuel_ledger::FuelLedger;

/// Una opción del catálogo, tal como la consume el formulario del cliente
#[derive(Debug, Serialize)]
pub struct CatalogOptionResponse {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Un ítem inspeccionable del catálogo
#[derive(Debug, Serialize)]
pub struct CatalogItemResponse {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub options: Vec<CatalogOptionResponse>,
}

impl From<&'static ChecklistItem> for CatalogItemResponse {
    fn from(item: &'static ChecklistItem) -> Self {
        Self {
            key: item.key,
            title: item.title,
            description: item.description,
            options: item
                .options
                .iter()
                .map(|o| CatalogOptionResponse {
                    value: o.value,
                    label: o.label,
                    color: o.color,
                })
                .collect(),
        }
    }
}

/// Request para crear el checklist de salida de un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChecklistRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 2, max = 120))]
    pub driver_name: String,

    pub departure_mileage: i64,

    /// Clave de ítem del catálogo -> valor crudo elegido
    pub items: HashMap<String, String>,

    pub notes: Option<String>,
}

/// Un repostaje tal como lo ingresa el usuario. El total pagado se calcula
/// aquí (precio por litro x litros); el precio por litro no se persiste.
#[derive(Debug, Deserialize)]
pub struct RefuelingInput {
    pub price_per_liter: Decimal,
    pub liters: Decimal,
    #[serde(rename = "type")]
    pub fuel_type: FuelType,
}

impl RefuelingInput {
    pub fn into_refueling(self) -> Refueling {
        Refueling {
            amount: self.price_per_liter * self.liters,
            liters: self.liters,
            fuel_type: self.fuel_type,
        }
    }
}

/// Request para registrar la llegada (o corregirla, si es admin)
#[derive(Debug, Deserialize)]
pub struct ArrivalRequest {
    pub arrival_mileage: i64,
    #[serde(default)]
    pub refuelings: Vec<RefuelingInput>,
}

/// Filtros de listado de checklists
#[derive(Debug, Deserialize)]
pub struct ChecklistFilters {
    pub vehicle_id: Option<Uuid>,
}

/// Resumen de combustible derivado de los repostajes de un checklist
#[derive(Debug, Serialize)]
pub struct FuelSummary {
    pub total_liters: Decimal,
    pub total_cost: Decimal,
    /// km por litro; None cuando no hay distancia o litros (se muestra "N/A")
    pub efficiency: Option<f64>,
    pub efficiency_rating: Option<String>,
}

/// Response de checklist para la API
#[derive(Debug, Serialize)]
pub struct ChecklistResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub driver_name: String,
    pub departure_timestamp: DateTime<Utc>,
    pub arrival_timestamp: Option<DateTime<Utc>>,
    pub departure_mileage: i64,
    pub arrival_mileage: Option<i64>,
    pub items: HashMap<String, String>,
    pub notes: Option<String>,
    pub status: String,
    pub date: NaiveDate,
    pub ai_diagnosis: Option<String>,
    pub refuelings: Vec<Refueling>,
    pub distance: Option<i64>,
    pub fuel: FuelSummary,
}

impl From<DailyChecklist> for ChecklistResponse {
    fn from(checklist: DailyChecklist) -> Self {
        let distance = checklist.distance();
        let ledger = FuelLedger::new(&checklist.refuelings.0);
        let efficiency = distance.and_then(|d| ledger.efficiency(d));
        let fuel = FuelSummary {
            total_liters: ledger.total_liters(),
            total_cost: ledger.total_cost(),
            efficiency,
            efficiency_rating: efficiency
                .map(|e| crate::services::fuel_ledger::EfficiencyRating::from_km_per_liter(e).as_str().to_string()),
        };

        Self {
            id: checklist.id,
            vehicle_id: checklist.vehicle_id,
            driver_id: checklist.driver_id,
            driver_name: checklist.driver_name,
            departure_timestamp: checklist.departure_timestamp,
            arrival_timestamp: checklist.arrival_timestamp,
            departure_mileage: checklist.departure_mileage,
            arrival_mileage: checklist.arrival_mileage,
            items: checklist.items.0,
            notes: checklist.notes,
            status: checklist.status,
            date: checklist.date,
            ai_diagnosis: checklist.ai_diagnosis,
            refuelings: checklist.refuelings.0,
            distance,
            fuel,
        }
    }
}
