//! Ciclo de vida del checklist diario
//!
//! Máquina de estados de un viaje: la salida crea el registro, la llegada
//! lo cierra. Transiciones válidas: pending_arrival -> completed | problem;
//! un checklist cerrado solo admite corrección de kilometraje por un admin
//! y edición de repostajes, nunca cambia de estado.

use chrono::{DateTime, Local, Timelike, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::checklist_dto::CreateChecklistRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::catalog;
use crate::models::checklist::{ChecklistStatus, DailyChecklist, Refueling};
use crate::models::user::UserRole;
use crate::repositories::checklist_repository::ChecklistRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::{self, Action};
use crate::services::diagnosis_service::{build_diagnosis_input, DiagnosisClient};
use crate::utils::errors::{validation_error, AppError};

/// Qué hay que persistir después de aplicar una llegada
#[derive(Debug, PartialEq, Eq)]
pub enum ArrivalEffect {
    /// Cierre normal del viaje: llegada + odómetro del vehículo
    CloseTrip,
    /// Corrección de un admin sobre un checklist cerrado
    AdminCorrection { mileage_changed: bool },
    /// Un colaborador solo reemplazó los repostajes
    RefuelingsOnly,
}

/// La ventana de registro de salidas cierra a la hora de corte configurada
pub fn submission_window_open(hour: u32, cutoff_hour: u32) -> bool {
    hour < cutoff_hour
}

/// Estado inicial de un checklist según sus valores de inspección.
/// Falla ante claves desconocidas, antes de cualquier escritura.
pub fn initial_status(
    items: &std::collections::HashMap<String, String>,
) -> Result<ChecklistStatus, AppError> {
    if catalog::has_problems(items)? {
        Ok(ChecklistStatus::Problem)
    } else {
        Ok(ChecklistStatus::PendingArrival)
    }
}

/// Estado de cierre al registrar la llegada, derivado de los ítems ya
/// guardados. Claves que dejaron de existir en el catálogo se ignoran.
pub fn closing_status(items: &std::collections::HashMap<String, String>) -> ChecklistStatus {
    if catalog::problem_entries(items).is_empty() {
        ChecklistStatus::Completed
    } else {
        ChecklistStatus::Problem
    }
}

/// Aplica una llegada sobre el modelo en memoria. Toda la validación ocurre
/// antes de mutar: si devuelve Err, el checklist queda intacto.
pub fn apply_arrival(
    checklist: &mut DailyChecklist,
    arrival_mileage: i64,
    refuelings: Vec<Refueling>,
    now: DateTime<Utc>,
    is_admin: bool,
) -> Result<ArrivalEffect, AppError> {
    if arrival_mileage < checklist.departure_mileage {
        return Err(validation_error(
            "arrival_mileage",
            "El kilometraje de llegada no puede ser menor al de salida",
        ));
    }

    let status = checklist
        .status()
        .ok_or_else(|| AppError::Internal(format!("Estado de checklist desconocido: {}", checklist.status)))?;

    match status {
        ChecklistStatus::PendingArrival => {
            let new_status = closing_status(&checklist.items.0);

            checklist.status = new_status.as_str().to_string();
            checklist.arrival_timestamp = Some(now);
            checklist.arrival_mileage = Some(arrival_mileage);
            checklist.refuelings = Json(refuelings);

            Ok(ArrivalEffect::CloseTrip)
        }
        ChecklistStatus::Completed | ChecklistStatus::Problem => {
            // Cerrado: estado y timestamp de llegada son inmutables
            if is_admin {
                let mileage_changed = checklist.arrival_mileage != Some(arrival_mileage);

                checklist.arrival_mileage = Some(arrival_mileage);
                checklist.refuelings = Json(refuelings);

                Ok(ArrivalEffect::AdminCorrection { mileage_changed })
            } else {
                if checklist.arrival_mileage != Some(arrival_mileage) {
                    return Err(AppError::Forbidden(
                        "Solo un administrador puede corregir el kilometraje de un checklist cerrado"
                            .to_string(),
                    ));
                }

                checklist.refuelings = Json(refuelings);

                Ok(ArrivalEffect::RefuelingsOnly)
            }
        }
    }
}

/// Servicio del ciclo de vida de checklists
pub struct ChecklistService {
    checklists: ChecklistRepository,
    vehicles: VehicleRepository,
    diagnosis: Option<Arc<dyn DiagnosisClient>>,
    cutoff_hour: u32,
}

impl ChecklistService {
    pub fn new(
        pool: PgPool,
        config: &EnvironmentConfig,
        diagnosis: Option<Arc<dyn DiagnosisClient>>,
    ) -> Self {
        Self {
            checklists: ChecklistRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
            diagnosis,
            cutoff_hour: config.checklist_cutoff_hour,
        }
    }

    /// Transición 1: crear el checklist de salida
    pub async fn create_departure(
        &self,
        actor: &AuthenticatedUser,
        request: CreateChecklistRequest,
    ) -> Result<DailyChecklist, AppError> {
        authorization_service::require(actor, Action::CreateChecklist)?;
        request.validate()?;

        if request.items.is_empty() {
            return Err(validation_error("items", "El checklist no puede estar vacío"));
        }

        // Resuelve todos los ítems contra el catálogo y deriva el estado;
        // claves desconocidas abortan antes de escribir
        let status = initial_status(&request.items)?;

        let now_local = Local::now();
        if !submission_window_open(now_local.hour(), self.cutoff_hour) {
            return Err(validation_error(
                "departure_timestamp",
                "La ventana de registro de salidas ya cerró por hoy",
            ));
        }

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if request.departure_mileage < vehicle.mileage {
            return Err(validation_error(
                "departure_mileage",
                "El kilometraje de salida no puede ser menor al actual del vehículo",
            ));
        }

        let checklist = DailyChecklist {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            driver_id: Some(actor.user_id),
            driver_name: request.driver_name.trim().to_string(),
            departure_timestamp: Utc::now(),
            arrival_timestamp: None,
            departure_mileage: request.departure_mileage,
            arrival_mileage: None,
            items: Json(request.items),
            notes: request
                .notes
                .and_then(|n| {
                    let trimmed = n.trim().to_string();
                    if trimmed.is_empty() { None } else { Some(trimmed) }
                }),
            status: status.as_str().to_string(),
            // El día calendario se fija al crear y nunca se recalcula
            date: now_local.date_naive(),
            ai_diagnosis: None,
            refuelings: Json(vec![]),
        };

        self.checklists.create(&checklist).await?;

        log::info!(
            "📋 Checklist {} creado para vehículo {} con estado {}",
            checklist.id,
            vehicle.license_plate,
            checklist.status
        );

        // Enriquecimiento best-effort: una caída del diagnóstico nunca
        // bloquea el registro del viaje ya confirmado
        let mut checklist = checklist;
        if status == ChecklistStatus::Problem {
            if let Some(diagnosis_text) = self.run_diagnosis(&vehicle, &checklist).await {
                if self
                    .checklists
                    .set_ai_diagnosis(checklist.id, &diagnosis_text)
                    .await
                    .is_ok()
                {
                    checklist.ai_diagnosis = Some(diagnosis_text);
                }
            }
        }

        Ok(checklist)
    }

    async fn run_diagnosis(
        &self,
        vehicle: &crate::models::vehicle::Vehicle,
        checklist: &DailyChecklist,
    ) -> Option<String> {
        let client = self.diagnosis.as_ref()?;
        let request = build_diagnosis_input(vehicle, &checklist.items.0, checklist.notes.as_deref());

        match client.diagnose(&request).await {
            Ok(response) => Some(response.potential_problems),
            Err(e) => {
                tracing::warn!("Diagnóstico no disponible para checklist {}: {}", checklist.id, e);
                None
            }
        }
    }

    /// Transición 2: registrar la llegada o corregir un checklist cerrado
    pub async fn record_arrival(
        &self,
        actor: &AuthenticatedUser,
        checklist_id: Uuid,
        arrival_mileage: i64,
        refuelings: Vec<Refueling>,
    ) -> Result<DailyChecklist, AppError> {
        authorization_service::require(actor, Action::RecordArrival)?;

        let mut checklist = self
            .checklists
            .find_by_id(checklist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Checklist no encontrado".to_string()))?;

        let is_admin = actor.role == UserRole::Admin;
        let effect = apply_arrival(&mut checklist, arrival_mileage, refuelings, Utc::now(), is_admin)?;

        match effect {
            ArrivalEffect::CloseTrip => {
                self.checklists.save_arrival(&checklist, true).await?;
            }
            ArrivalEffect::AdminCorrection { mileage_changed } => {
                self.checklists.save_arrival(&checklist, mileage_changed).await?;
            }
            ArrivalEffect::RefuelingsOnly => {
                self.checklists
                    .update_refuelings(checklist.id, &checklist.refuelings.0)
                    .await?;
            }
        }

        Ok(checklist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checklist::FuelType;
    use std::collections::HashMap;

    fn items(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn open_checklist(item_entries: &[(&str, &str)]) -> DailyChecklist {
        DailyChecklist {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            driver_id: None,
            driver_name: "Marta".to_string(),
            departure_timestamp: Utc::now(),
            arrival_timestamp: None,
            departure_mileage: 5000,
            arrival_mileage: None,
            items: Json(items(item_entries)),
            notes: None,
            status: ChecklistStatus::PendingArrival.as_str().to_string(),
            date: Utc::now().date_naive(),
            ai_diagnosis: None,
            refuelings: Json(vec![]),
        }
    }

    fn refueling(liters: &str) -> Refueling {
        Refueling {
            amount: "100".parse().unwrap(),
            liters: liters.parse().unwrap(),
            fuel_type: FuelType::Gasolina,
        }
    }

    #[test]
    fn test_submission_window() {
        assert!(submission_window_open(8, 22));
        assert!(submission_window_open(21, 22));
        assert!(!submission_window_open(22, 22));
        assert!(!submission_window_open(23, 22));
    }

    #[test]
    fn test_initial_status_problem_with_empty_fuel() {
        let status = initial_status(&items(&[
            ("fuel_level", "vacio"),
            ("lights", "funcionando"),
        ]))
        .unwrap();
        assert_eq!(status, ChecklistStatus::Problem);
    }

    #[test]
    fn test_initial_status_pending_when_all_ok() {
        let status = initial_status(&items(&[
            ("fuel_level", "lleno"),
            ("lights", "funcionando"),
        ]))
        .unwrap();
        assert_eq!(status, ChecklistStatus::PendingArrival);
    }

    #[test]
    fn test_initial_status_rejects_unknown_item() {
        assert!(initial_status(&items(&[("turbina", "ok")])).is_err());
    }

    #[test]
    fn test_arrival_closes_clean_trip_as_completed() {
        let mut checklist = open_checklist(&[("fuel_level", "lleno")]);

        let effect =
            apply_arrival(&mut checklist, 5200, vec![refueling("10")], Utc::now(), false).unwrap();

        assert_eq!(effect, ArrivalEffect::CloseTrip);
        assert_eq!(checklist.status(), Some(ChecklistStatus::Completed));
        assert_eq!(checklist.arrival_mileage, Some(5200));
        assert!(checklist.arrival_timestamp.is_some());
        assert_eq!(checklist.refuelings.0.len(), 1);
    }

    #[test]
    fn test_arrival_closes_defective_trip_as_problem() {
        let mut checklist = open_checklist(&[("tire_pressure", "baja")]);

        apply_arrival(&mut checklist, 5100, vec![], Utc::now(), false).unwrap();

        assert_eq!(checklist.status(), Some(ChecklistStatus::Problem));
    }

    #[test]
    fn test_arrival_rejects_lower_mileage_without_mutating() {
        let mut checklist = open_checklist(&[("fuel_level", "lleno")]);

        let result = apply_arrival(&mut checklist, 4999, vec![refueling("5")], Utc::now(), true);

        assert!(matches!(result, Err(AppError::Validation(_))));
        // El rechazo ocurre antes de cualquier mutación
        assert_eq!(checklist.status(), Some(ChecklistStatus::PendingArrival));
        assert_eq!(checklist.arrival_mileage, None);
        assert!(checklist.refuelings.0.is_empty());
    }

    #[test]
    fn test_closed_checklist_never_changes_status() {
        let mut checklist = open_checklist(&[("fuel_level", "lleno")]);
        apply_arrival(&mut checklist, 5200, vec![], Utc::now(), false).unwrap();
        let closed_at = checklist.arrival_timestamp;

        // Corrección de admin: el estado y el timestamp no cambian
        let effect = apply_arrival(&mut checklist, 5300, vec![], Utc::now(), true).unwrap();

        assert_eq!(effect, ArrivalEffect::AdminCorrection { mileage_changed: true });
        assert_eq!(checklist.status(), Some(ChecklistStatus::Completed));
        assert_eq!(checklist.arrival_timestamp, closed_at);
        assert_eq!(checklist.arrival_mileage, Some(5300));
    }

    #[test]
    fn test_non_admin_cannot_correct_closed_mileage() {
        let mut checklist = open_checklist(&[("fuel_level", "lleno")]);
        apply_arrival(&mut checklist, 5200, vec![], Utc::now(), false).unwrap();

        let result = apply_arrival(&mut checklist, 5300, vec![], Utc::now(), false);

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(checklist.arrival_mileage, Some(5200));
    }

    #[test]
    fn test_non_admin_can_replace_refuelings_on_closed() {
        let mut checklist = open_checklist(&[("fuel_level", "lleno")]);
        apply_arrival(&mut checklist, 5200, vec![refueling("10")], Utc::now(), false).unwrap();

        let effect = apply_arrival(
            &mut checklist,
            5200,
            vec![refueling("10"), refueling("20")],
            Utc::now(),
            false,
        )
        .unwrap();

        // Reemplazo total, no merge
        assert_eq!(effect, ArrivalEffect::RefuelingsOnly);
        assert_eq!(checklist.refuelings.0.len(), 2);
        assert_eq!(checklist.status(), Some(ChecklistStatus::Completed));
    }

    #[test]
    fn test_admin_correction_same_mileage_does_not_touch_vehicle() {
        let mut checklist = open_checklist(&[("fuel_level", "lleno")]);
        apply_arrival(&mut checklist, 5200, vec![], Utc::now(), false).unwrap();

        let effect = apply_arrival(&mut checklist, 5200, vec![refueling("8")], Utc::now(), true).unwrap();

        assert_eq!(effect, ArrivalEffect::AdminCorrection { mileage_changed: false });
    }
}
