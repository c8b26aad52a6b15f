//! Servicio de diagnóstico externo
//!
//! Colaborador opaco de texto: recibe la descripción del vehículo y los
//! defectos encontrados, devuelve posibles causas. Es best-effort y se
//! invoca después de confirmar la escritura del checklist; un fallo aquí
//! nunca bloquea el registro del viaje.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::catalog;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

/// Payload hacia el servicio de diagnóstico
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRequest {
    pub vehicle_info: String,
    pub checklist_responses: String,
}

/// Respuesta del servicio de diagnóstico
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResponse {
    pub potential_problems: String,
}

/// Cliente del colaborador de diagnóstico
#[async_trait]
pub trait DiagnosisClient: Send + Sync {
    async fn diagnose(&self, request: &DiagnosisRequest) -> Result<DiagnosisResponse, AppError>;
}

/// Implementación HTTP del cliente de diagnóstico
pub struct HttpDiagnosisClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpDiagnosisClient {
    pub fn new(http_client: reqwest::Client, endpoint: String) -> Self {
        Self { http_client, endpoint }
    }
}

#[async_trait]
impl DiagnosisClient for HttpDiagnosisClient {
    async fn diagnose(&self, request: &DiagnosisRequest) -> Result<DiagnosisResponse, AppError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error llamando al servicio de diagnóstico: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "El servicio de diagnóstico respondió {}",
                response.status()
            )));
        }

        response
            .json::<DiagnosisResponse>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta de diagnóstico inválida: {}", e)))
    }
}

/// Arma el payload de diagnóstico a partir del vehículo, los valores de
/// inspección y las notas del conductor. Solo los ítems clasificados como
/// defecto entran en el texto.
pub fn build_diagnosis_input(
    vehicle: &Vehicle,
    items: &HashMap<String, String>,
    notes: Option<&str>,
) -> DiagnosisRequest {
    let mut lines: Vec<String> = catalog::problem_entries(items)
        .into_iter()
        .map(|(item, value_label)| format!("- {}: {}", item.title, value_label))
        .collect();

    if let Some(notes) = notes {
        if !notes.trim().is_empty() {
            lines.push(format!("Notas del conductor: {}", notes.trim()));
        }
    }

    DiagnosisRequest {
        vehicle_info: vehicle.description(),
        checklist_responses: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_vehicle() -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            brand: "Ford".to_string(),
            model: "Ranger".to_string(),
            year: 2019,
            license_plate: "XYZ-987".to_string(),
            color: None,
            mileage: 80_000,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_input_contains_flagged_item() {
        let mut items = HashMap::new();
        items.insert("fuel_level".to_string(), "vacio".to_string());
        items.insert("lights".to_string(), "funcionando".to_string());

        let request = build_diagnosis_input(&sample_vehicle(), &items, None);

        assert!(request.checklist_responses.contains("Nivel de combustible"));
        assert!(!request.checklist_responses.contains("Luces"));
        assert!(request.vehicle_info.contains("Ford Ranger"));
    }

    #[test]
    fn test_input_includes_driver_notes() {
        let mut items = HashMap::new();
        items.insert("tire_pressure".to_string(), "baja".to_string());

        let request = build_diagnosis_input(
            &sample_vehicle(),
            &items,
            Some("vibración en el volante"),
        );

        assert!(request.checklist_responses.contains("Presión de neumáticos"));
        assert!(request.checklist_responses.contains("vibración en el volante"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = DiagnosisRequest {
            vehicle_info: "info".to_string(),
            checklist_responses: "respuestas".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("vehicleInfo"));
        assert!(json.contains("checklistResponses"));
    }
}
