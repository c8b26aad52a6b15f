use crate::models::deletion_report::DeletionReport;
use crate::models::user::User;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn count_admins(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn create(
        &self,
        name: String,
        role: &str,
        password_hash: String,
    ) -> Result<User, AppError> {
        let existing = self.find_by_name(&name).await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!("El usuario '{}' ya existe", name)));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_role(&self, id: Uuid, role: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        Ok(())
    }

    /// Elimina un usuario y crea su reporte de auditoría en una sola
    /// transacción: ambos existen después, o ninguno.
    pub async fn delete_with_report(
        &self,
        target: &User,
        admin_id: Uuid,
        admin_name: &str,
        reason: &str,
    ) -> Result<DeletionReport, AppError> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, DeletionReport>(
            r#"
            INSERT INTO deletion_reports (
                id, deleted_user_id, deleted_user_name, admin_id, admin_name, reason, timestamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(target.id)
        .bind(&target.name)
        .bind(admin_id)
        .bind(admin_name)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(target.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // El tx se descarta sin commit: el reporte no queda persistido
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        tx.commit().await?;

        Ok(report)
    }

    pub async fn list_deletion_reports(&self) -> Result<Vec<DeletionReport>, AppError> {
        let reports = sqlx::query_as::<_, DeletionReport>(
            "SELECT * FROM deletion_reports ORDER BY timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    /// Borrado irreversible de un reporte de auditoría (solo admin)
    pub async fn delete_deletion_report(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM deletion_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Reporte no encontrado".to_string()));
        }

        Ok(())
    }
}
