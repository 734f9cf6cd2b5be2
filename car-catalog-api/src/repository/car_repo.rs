use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::{Car, CarInput};

/// Row as stored: `features` is a JSON-encoded string array and never leaves
/// this module in that form.
#[derive(Debug, FromRow)]
struct CarRow {
    id: String,
    model: String,
    #[sqlx(rename = "maxSpeed")]
    max_speed: f64,
    features: String,
    year: Option<i32>,
}

impl TryFrom<CarRow> for Car {
    type Error = sqlx::Error;

    fn try_from(row: CarRow) -> Result<Self, Self::Error> {
        let features: Vec<String> =
            serde_json::from_str(&row.features).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Car {
            id: row.id,
            model: row.model,
            max_speed: row.max_speed,
            features,
            year: row.year,
        })
    }
}

fn encode_features(features: &[String]) -> Result<String, sqlx::Error> {
    serde_json::to_string(features).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

const SELECT_CAR: &str = "SELECT id, model, maxSpeed, features, year FROM car";

#[derive(Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Car>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CarRow>(&format!("{} ORDER BY rowid", SELECT_CAR))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Car::try_from).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Car>, sqlx::Error> {
        sqlx::query_as::<_, CarRow>(&format!("{} WHERE id = ?", SELECT_CAR))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Car::try_from)
            .transpose()
    }

    /// First car whose model matches exactly, in insertion order.
    pub async fn find_by_model(&self, model: &str) -> Result<Option<Car>, sqlx::Error> {
        sqlx::query_as::<_, CarRow>(&format!("{} WHERE model = ? ORDER BY rowid LIMIT 1", SELECT_CAR))
            .bind(model)
            .fetch_optional(&self.pool)
            .await?
            .map(Car::try_from)
            .transpose()
    }

    /// Inserts a new car and returns its generated id.
    pub async fn create(&self, input: &CarInput) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO car (id, model, maxSpeed, features, year) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&input.model)
        .bind(input.max_speed)
        .bind(encode_features(&input.features)?)
        .bind(input.year)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Replaces every field but `id`. Returns the fresh record, or `None` when
    /// no car has that id.
    pub async fn update(&self, id: &str, input: &CarInput) -> Result<Option<Car>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE car SET model = ?, maxSpeed = ?, features = ?, year = ? WHERE id = ?",
        )
        .bind(&input.model)
        .bind(input.max_speed)
        .bind(encode_features(&input.features)?)
        .bind(input.year)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM car")
            .fetch_one(&self.pool)
            .await
    }
}
