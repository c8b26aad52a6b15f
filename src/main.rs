mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{
    middleware as axum_middleware,
    response::Json,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use config::environment::EnvironmentConfig;
use middleware::auth::auth_middleware;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚛 Fleet Checklist - Gestión de flota y checklists diarios");
    info!("==========================================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();

    if config.diagnosis_service_url.is_some() {
        info!("✅ Servicio de diagnóstico configurado");
    } else {
        info!("ℹ️ Servicio de diagnóstico no configurado; los checklists con problemas se guardan sin diagnóstico");
    }

    let app_state = AppState::new(pool, config.clone());

    // Rutas protegidas por JWT
    let protected = Router::new()
        .nest("/api/auth", routes::auth_routes::create_protected_auth_router())
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/checklist", routes::checklist_routes::create_checklist_router())
        .nest("/api/report", routes::report_routes::create_report_router())
        .nest("/api/user", routes::user_routes::create_user_router())
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .merge(protected)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Endpoints - Auth:");
    info!("   POST /api/auth/login - Login");
    info!("   POST /api/auth/change-password - Cambiar contraseña propia");
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicle - Registrar vehículo");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id - Actualizar vehículo");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo (admin)");
    info!("📋 Endpoints - Checklist:");
    info!("   GET  /api/checklist/catalog - Catálogo de ítems");
    info!("   POST /api/checklist - Registrar salida");
    info!("   GET  /api/checklist - Listar checklists");
    info!("   GET  /api/checklist/:id - Obtener checklist");
    info!("   PUT  /api/checklist/:id/arrival - Registrar llegada / corregir");
    info!("📊 Endpoints - Report:");
    info!("   GET  /api/report/weekly-average - Promedio semanal");
    info!("   GET  /api/report/streak - Racha de días consecutivos");
    info!("   GET  /api/report/consumption - Tabla de viajes y consumo");
    info!("   GET  /api/report/monthly/:vehicle_id - Reporte mensual");
    info!("👥 Endpoints - User (admin):");
    info!("   GET  /api/user - Listar usuarios");
    info!("   POST /api/user - Crear usuario");
    info!("   PUT  /api/user/:id/role - Cambiar rol");
    info!("   DELETE /api/user/:id - Eliminar usuario + reporte de auditoría");
    info!("   POST /api/user/:id/reset-password - Resetear contraseña");
    info!("   GET  /api/user/deletion-reports - Reportes de auditoría");
    info!("   DELETE /api/user/deletion-reports/:id - Borrar reporte");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de health check
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-checklist",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
