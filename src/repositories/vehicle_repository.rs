use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use chrono::Utc;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        brand: String,
        model: String,
        year: i32,
        license_plate: String,
        color: Option<String>,
        mileage: i64,
    ) -> Result<Vehicle, AppError> {
        let id = Uuid::new_v4();

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, brand, model, year, license_plate, color, mileage, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(license_plate)
        .bind(color)
        .bind(mileage)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn license_plate_exists(&self, license_plate: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1)",
        )
        .bind(license_plate)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Actualización por merge: los campos ausentes conservan su valor.
    /// El kilometraje puede bajar aquí como corrección explícita.
    pub async fn update(
        &self,
        id: Uuid,
        brand: Option<String>,
        model: Option<String>,
        year: Option<i32>,
        license_plate: Option<String>,
        color: Option<String>,
        mileage: Option<i64>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET brand = $2, model = $3, year = $4, license_plate = $5, color = $6, mileage = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(brand.unwrap_or(current.brand))
        .bind(model.unwrap_or(current.model))
        .bind(year.unwrap_or(current.year))
        .bind(license_plate.unwrap_or(current.license_plate))
        .bind(color.or(current.color))
        .bind(mileage.unwrap_or(current.mileage))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Eliminación dura, sin cascada: los checklists conservan su vehicle_id
    /// y los reportes los muestran como "Vehículo no encontrado".
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }
}
