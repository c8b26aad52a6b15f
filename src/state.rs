//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No hay estado mutable en memoria: la base
//! de datos es la única fuente de verdad.

use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::diagnosis_service::{DiagnosisClient, HttpDiagnosisClient};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub http_client: Client,
    /// Cliente del colaborador de diagnóstico; None cuando no hay URL configurada
    pub diagnosis: Option<Arc<dyn DiagnosisClient>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let http_client = Client::new();

        let diagnosis: Option<Arc<dyn DiagnosisClient>> = config
            .diagnosis_service_url
            .clone()
            .map(|url| Arc::new(HttpDiagnosisClient::new(http_client.clone(), url)) as Arc<dyn DiagnosisClient>);

        Self {
            pool,
            config,
            http_client,
            diagnosis,
        }
    }
}
