use sqlx::SqlitePool;
use uuid::Uuid;

/// Append-only history of travel-time calculations. Nothing reads it back.
#[derive(Clone)]
pub struct TravelLogRepository {
    pool: SqlitePool,
}

impl TravelLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record_request(&self, distance: f64, model: &str) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO travel_time_request (id, distance, model) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(distance.to_string())
            .bind(model)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn record_response(
        &self,
        hours: u64,
        minutes: u32,
        car_id: &str,
    ) -> Result<String, sqlx::Error> {
        let hours = i64::try_from(hours).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO travel_time_response (id, hours, minutes, carId) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(hours)
        .bind(i64::from(minutes))
        .bind(car_id)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}
