//! Modelo de DeletionReport
//!
//! Registro de auditoría que se crea junto con la eliminación de un usuario.
//! Es append-only: nunca se actualiza, solo un admin puede borrarlo.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// DeletionReport - mapea exactamente a la tabla deletion_reports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeletionReport {
    pub id: Uuid,
    pub deleted_user_id: Uuid,
    pub deleted_user_name: String,
    pub admin_id: Uuid,
    pub admin_name: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
