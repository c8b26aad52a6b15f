use crate::models::checklist::{DailyChecklist, Refueling};
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ChecklistRepository {
    pool: PgPool,
}

impl ChecklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta el checklist de salida y actualiza el kilometraje del
    /// vehículo en una sola transacción: ambas escrituras o ninguna.
    pub async fn create(&self, checklist: &DailyChecklist) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO checklists (
                id, vehicle_id, driver_id, driver_name,
                departure_timestamp, arrival_timestamp,
                departure_mileage, arrival_mileage,
                items, notes, status, date, ai_diagnosis, refuelings
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(checklist.id)
        .bind(checklist.vehicle_id)
        .bind(checklist.driver_id)
        .bind(&checklist.driver_name)
        .bind(checklist.departure_timestamp)
        .bind(checklist.arrival_timestamp)
        .bind(checklist.departure_mileage)
        .bind(checklist.arrival_mileage)
        .bind(checklist.items.clone())
        .bind(&checklist.notes)
        .bind(&checklist.status)
        .bind(checklist.date)
        .bind(&checklist.ai_diagnosis)
        .bind(checklist.refuelings.clone())
        .execute(&mut *tx)
        .await?;

        // Contrato de efecto colateral: el odómetro del vehículo sigue
        // al kilometraje de salida recién registrado
        sqlx::query("UPDATE vehicles SET mileage = $2 WHERE id = $1")
            .bind(checklist.vehicle_id)
            .bind(checklist.departure_mileage)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DailyChecklist>, AppError> {
        let checklist = sqlx::query_as::<_, DailyChecklist>("SELECT * FROM checklists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(checklist)
    }

    pub async fn list_all(&self) -> Result<Vec<DailyChecklist>, AppError> {
        let checklists = sqlx::query_as::<_, DailyChecklist>(
            "SELECT * FROM checklists ORDER BY departure_timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(checklists)
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<DailyChecklist>, AppError> {
        let checklists = sqlx::query_as::<_, DailyChecklist>(
            "SELECT * FROM checklists WHERE vehicle_id = $1 ORDER BY departure_timestamp DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(checklists)
    }

    /// Checklists de un vehículo dentro de [start, end), descendente.
    /// Usado por el reporte mensual.
    pub async fn list_for_period(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyChecklist>, AppError> {
        let checklists = sqlx::query_as::<_, DailyChecklist>(
            r#"
            SELECT * FROM checklists
            WHERE vehicle_id = $1
              AND departure_timestamp >= $2
              AND departure_timestamp < $3
            ORDER BY departure_timestamp DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(checklists)
    }

    /// Persiste la llegada (estado, timestamp, kilometraje y repostajes) y,
    /// si corresponde, el odómetro del vehículo, en una sola transacción.
    pub async fn save_arrival(
        &self,
        checklist: &DailyChecklist,
        update_vehicle_mileage: bool,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE checklists
            SET arrival_timestamp = $2, arrival_mileage = $3, status = $4, refuelings = $5
            WHERE id = $1
            "#,
        )
        .bind(checklist.id)
        .bind(checklist.arrival_timestamp)
        .bind(checklist.arrival_mileage)
        .bind(&checklist.status)
        .bind(checklist.refuelings.clone())
        .execute(&mut *tx)
        .await?;

        if update_vehicle_mileage {
            if let Some(arrival_mileage) = checklist.arrival_mileage {
                sqlx::query("UPDATE vehicles SET mileage = $2 WHERE id = $1")
                    .bind(checklist.vehicle_id)
                    .bind(arrival_mileage)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Reemplaza los repostajes sin tocar estado ni kilometrajes
    pub async fn update_refuelings(
        &self,
        id: Uuid,
        refuelings: &[Refueling],
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE checklists SET refuelings = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(refuelings.to_vec()))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Enriquecimiento posterior al guardado; nunca forma parte de la
    /// transacción de creación
    pub async fn set_ai_diagnosis(&self, id: Uuid, diagnosis: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE checklists SET ai_diagnosis = $2 WHERE id = $1")
            .bind(id)
            .bind(diagnosis)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
