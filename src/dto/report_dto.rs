use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleResponse;

/// Promedio de cumplimiento de los últimos 7 días
#[derive(Debug, Serialize)]
pub struct WeeklyAverageResponse {
    pub average: u32,
}

/// Racha de días consecutivos con al menos un checklist
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub consecutive_days: u32,
}

/// Una fila de la tabla de viajes/consumo
#[derive(Debug, Serialize)]
pub struct ConsumptionRow {
    pub checklist_id: Uuid,
    pub vehicle_label: String,
    pub driver_name: String,
    pub date: NaiveDate,
    pub departure_timestamp: DateTime<Utc>,
    pub distance_km: i64,
    pub total_liters: Decimal,
    pub total_cost: Decimal,
    /// km por litro; None se muestra como "N/A"
    pub efficiency: Option<f64>,
    pub efficiency_rating: Option<String>,
}

/// Parámetros del reporte mensual
#[derive(Debug, Deserialize)]
pub struct MonthlyReportParams {
    pub month: u32,
    pub year: i32,
}

/// Un defecto reportado en un checklist, con etiquetas del catálogo
#[derive(Debug, Serialize, PartialEq)]
pub struct DefectEntry {
    pub item: String,
    pub title: String,
    pub value_label: String,
}

/// Una fila del reporte mensual
#[derive(Debug, Serialize)]
pub struct MonthlyChecklistRow {
    pub checklist_id: Uuid,
    pub date: NaiveDate,
    pub driver_name: String,
    pub status: String,
    pub defects: Vec<DefectEntry>,
    pub notes: Option<String>,
}

/// Reporte mensual por vehículo
#[derive(Debug, Serialize)]
pub struct MonthlyReportResponse {
    pub vehicle: VehicleResponse,
    pub month: u32,
    pub year: i32,
    pub total_checklists: usize,
    pub checklists_with_problems: usize,
    pub rows: Vec<MonthlyChecklistRow>,
}
