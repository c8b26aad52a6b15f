//! Agregación de reportes de flota
//!
//! Funciones puras sobre un snapshot de checklists (más el índice de
//! vehículos): promedio semanal de cumplimiento, racha de días
//! consecutivos, tabla de viajes/consumo y reporte mensual por vehículo.
//! La captura del snapshot es responsabilidad de los repositorios.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::dto::report_dto::{ConsumptionRow, DefectEntry, MonthlyChecklistRow, MonthlyReportResponse};
use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::catalog;
use crate::models::checklist::{ChecklistStatus, DailyChecklist};
use crate::models::vehicle::Vehicle;
use crate::services::fuel_ledger::{EfficiencyRating, FuelLedger};
use crate::utils::errors::AppError;

/// Máximo de días que camina hacia atrás el cálculo de racha
const MAX_STREAK_DAYS: u32 = 30;

/// Promedio de cumplimiento (% de ítems sin defecto) de los checklists
/// cerrados cuyos días caen en los últimos 7 días.
/// Sin checklists que califiquen, o sin ítems, devuelve 100.
pub fn weekly_average(checklists: &[DailyChecklist], today: NaiveDate) -> u32 {
    let window_start = today - Duration::days(6);

    let mut ok_items = 0usize;
    let mut total_items = 0usize;

    for checklist in checklists {
        if !checklist.is_closed() {
            continue;
        }
        if checklist.date < window_start || checklist.date > today {
            continue;
        }
        for (key, value) in checklist.items.0.iter() {
            // Claves que ya no existen en el catálogo se ignoran
            let Some(item) = catalog::find(key) else { continue };
            total_items += 1;
            if !item.is_problem(value) {
                ok_items += 1;
            }
        }
    }

    if total_items == 0 {
        return 100;
    }

    ((ok_items as f64 / total_items as f64) * 100.0).round() as u32
}

/// Días consecutivos (hoy inclusive) con al menos un checklist.
/// Se detiene en el primer hueco o al llegar a 30 días.
pub fn consecutive_streak(checklists: &[DailyChecklist], today: NaiveDate) -> u32 {
    let days_with_checklist: HashSet<NaiveDate> = checklists.iter().map(|c| c.date).collect();

    let mut streak = 0;
    for offset in 0..MAX_STREAK_DAYS {
        let day = today - Duration::days(offset as i64);
        if days_with_checklist.contains(&day) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Tabla de viajes con consumo: una fila por checklist cerrado con ambos
/// kilometrajes, timestamp de llegada y distancia positiva.
/// Ordenada por inicio de viaje descendente.
pub fn consumption_rows(checklists: &[DailyChecklist], vehicles: &[Vehicle]) -> Vec<ConsumptionRow> {
    let vehicles_by_id: HashMap<Uuid, &Vehicle> =
        vehicles.iter().map(|v| (v.id, v)).collect();

    let mut rows: Vec<ConsumptionRow> = checklists
        .iter()
        .filter_map(|checklist| {
            if !checklist.is_closed() {
                return None;
            }
            if checklist.arrival_timestamp.is_none() {
                return None;
            }
            let distance = checklist.distance()?;
            if distance <= 0 {
                return None;
            }

            let ledger = FuelLedger::new(&checklist.refuelings.0);
            let efficiency = ledger.efficiency(distance);

            // Checklists huérfanos de vehículo se muestran igual
            let vehicle_label = vehicles_by_id
                .get(&checklist.vehicle_id)
                .map(|v| v.label())
                .unwrap_or_else(|| "Vehículo no encontrado".to_string());

            Some(ConsumptionRow {
                checklist_id: checklist.id,
                vehicle_label,
                driver_name: checklist.driver_name.clone(),
                date: checklist.date,
                departure_timestamp: checklist.departure_timestamp,
                distance_km: distance,
                total_liters: ledger.total_liters(),
                total_cost: ledger.total_cost(),
                efficiency,
                efficiency_rating: efficiency
                    .map(|e| EfficiencyRating::from_km_per_liter(e).as_str().to_string()),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.departure_timestamp.cmp(&a.departure_timestamp));
    rows
}

/// Límites [inicio, fin) de un mes calendario en UTC, para filtrar por
/// `departure_timestamp` en la consulta.
pub fn month_bounds(month: u32, year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start_date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::BadRequest(format!("Mes inválido: {}/{}", month, year)))?;

    let next_start_date = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::BadRequest(format!("Mes inválido: {}/{}", month, year)))?;

    let start = Utc.from_utc_datetime(&start_date.and_hms_opt(0, 0, 0).unwrap());
    let end = Utc.from_utc_datetime(&next_start_date.and_hms_opt(0, 0, 0).unwrap());

    Ok((start, end))
}

/// Reporte mensual de un vehículo a partir de sus checklists del mes
/// (ya filtrados y ordenados descendente por el repositorio).
pub fn monthly_report(
    vehicle: Vehicle,
    month: u32,
    year: i32,
    checklists: &[DailyChecklist],
) -> MonthlyReportResponse {
    let total_checklists = checklists.len();
    let checklists_with_problems = checklists
        .iter()
        .filter(|c| c.status() == Some(ChecklistStatus::Problem))
        .count();

    let rows = checklists
        .iter()
        .map(|checklist| {
            let defects = catalog::problem_entries(&checklist.items.0)
                .into_iter()
                .map(|(item, value_label)| DefectEntry {
                    item: item.key.to_string(),
                    title: item.title.to_string(),
                    value_label,
                })
                .collect();

            MonthlyChecklistRow {
                checklist_id: checklist.id,
                date: checklist.date,
                driver_name: checklist.driver_name.clone(),
                status: checklist.status.clone(),
                defects,
                notes: checklist.notes.clone(),
            }
        })
        .collect();

    MonthlyReportResponse {
        vehicle: VehicleResponse::from(vehicle),
        month,
        year,
        total_checklists,
        checklists_with_problems,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn checklist_on(
        date: NaiveDate,
        status: &str,
        items: &[(&str, &str)],
    ) -> DailyChecklist {
        let map = items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let departure = Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap());

        DailyChecklist {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            driver_id: None,
            driver_name: "Laura".to_string(),
            departure_timestamp: departure,
            arrival_timestamp: Some(departure + Duration::hours(8)),
            departure_mileage: 1000,
            arrival_mileage: Some(1100),
            items: Json(map),
            notes: None,
            status: status.to_string(),
            date,
            ai_diagnosis: None,
            refuelings: Json(vec![]),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_weekly_average_empty_is_100() {
        assert_eq!(weekly_average(&[], today()), 100);
    }

    #[test]
    fn test_weekly_average_ignores_pending_and_old() {
        let checklists = vec![
            // Pendiente: no cuenta
            checklist_on(today(), "pending_arrival", &[("fuel_level", "vacio")]),
            // Fuera de la ventana de 7 días: no cuenta
            checklist_on(today() - Duration::days(10), "completed", &[("fuel_level", "vacio")]),
        ];
        assert_eq!(weekly_average(&checklists, today()), 100);
    }

    #[test]
    fn test_weekly_average_counts_items() {
        let checklists = vec![
            checklist_on(
                today(),
                "problem",
                &[
                    ("fuel_level", "vacio"),
                    ("lights", "funcionando"),
                    ("fluids", "correctos"),
                    ("documentation", "al_dia"),
                ],
            ),
        ];
        // 3 de 4 ítems ok -> 75%
        assert_eq!(weekly_average(&checklists, today()), 75);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let checklists = vec![
            checklist_on(today(), "completed", &[]),
            checklist_on(today() - Duration::days(1), "completed", &[]),
            // hueco en el día 2
            checklist_on(today() - Duration::days(3), "completed", &[]),
        ];
        assert_eq!(consecutive_streak(&checklists, today()), 2);
    }

    #[test]
    fn test_streak_zero_without_today() {
        let checklists = vec![checklist_on(today() - Duration::days(1), "completed", &[])];
        assert_eq!(consecutive_streak(&checklists, today()), 0);
    }

    #[test]
    fn test_streak_caps_at_30() {
        let checklists: Vec<DailyChecklist> = (0..45)
            .map(|i| checklist_on(today() - Duration::days(i), "completed", &[]))
            .collect();
        assert_eq!(consecutive_streak(&checklists, today()), 30);
    }

    #[test]
    fn test_consumption_rows_filters_and_sorts() {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            brand: "Nissan".to_string(),
            model: "NP300".to_string(),
            year: 2020,
            license_plate: "JKL-456".to_string(),
            color: None,
            mileage: 2000,
            created_at: Utc::now(),
        };

        let mut older = checklist_on(today() - Duration::days(2), "completed", &[]);
        older.vehicle_id = vehicle.id;

        let mut newer = checklist_on(today(), "problem", &[("fuel_level", "vacio")]);
        newer.vehicle_id = vehicle.id;

        // Sin llegada: se excluye
        let mut open = checklist_on(today(), "pending_arrival", &[]);
        open.vehicle_id = vehicle.id;
        open.arrival_timestamp = None;
        open.arrival_mileage = None;

        // Distancia cero: se excluye
        let mut zero_distance = checklist_on(today() - Duration::days(1), "completed", &[]);
        zero_distance.vehicle_id = vehicle.id;
        zero_distance.arrival_mileage = Some(zero_distance.departure_mileage);

        let rows = consumption_rows(&[older.clone(), open, zero_distance, newer.clone()], &[vehicle.clone()]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].checklist_id, newer.id);
        assert_eq!(rows[1].checklist_id, older.id);
        assert_eq!(rows[0].vehicle_label, "Nissan NP300 (JKL-456)");
        assert_eq!(rows[0].distance_km, 100);
        // Sin repostajes, la eficiencia queda indefinida
        assert_eq!(rows[0].efficiency, None);
    }

    #[test]
    fn test_consumption_rows_orphan_vehicle() {
        let checklist = checklist_on(today(), "completed", &[]);
        let rows = consumption_rows(&[checklist], &[]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vehicle_label, "Vehículo no encontrado");
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(12, 2023).unwrap();
        assert_eq!(start.to_rfc3339(), "2023-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        assert!(month_bounds(13, 2023).is_err());
    }

    #[test]
    fn test_monthly_report_defects() {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            brand: "Chevrolet".to_string(),
            model: "S10".to_string(),
            year: 2018,
            license_plate: "QWE-111".to_string(),
            color: None,
            mileage: 90_000,
            created_at: Utc::now(),
        };

        let with_problem = checklist_on(today(), "problem", &[("documentation", "vencida")]);
        let clean = checklist_on(today() - Duration::days(1), "completed", &[("documentation", "al_dia")]);

        let report = monthly_report(vehicle, 6, 2024, &[with_problem, clean]);

        assert_eq!(report.total_checklists, 2);
        assert_eq!(report.checklists_with_problems, 1);
        assert_eq!(report.rows[0].defects.len(), 1);
        assert_eq!(report.rows[0].defects[0].title, "Documentación");
        assert_eq!(report.rows[0].defects[0].value_label, "Vencida");
        assert!(report.rows[1].defects.is_empty());
    }
}
