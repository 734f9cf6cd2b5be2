use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::calculator;
use crate::constants::{API_NAME, CALCULATION_LOG_INTERVAL};
use crate::error::AppError;
use crate::models::{Car, CarInput, TravelTimeInput, TravelTimeResult};
use crate::repository::{CarRepository, TravelLogRepository};

pub const CAR_NOT_FOUND: &str = "Car not found";
pub const CAR_MODEL_NOT_FOUND: &str = "Car model not found";
pub const TRAVEL_TIME_OUT_OF_RANGE: &str = "Distance is too large for this car";

#[derive(Clone)]
pub struct CarService {
    car_repo: CarRepository,
    travel_log_repo: TravelLogRepository,
    calculation_count: Arc<AtomicU64>,
}

impl CarService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            car_repo: CarRepository::new(pool.clone()),
            travel_log_repo: TravelLogRepository::new(pool),
            calculation_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(super) fn repository(&self) -> &CarRepository {
        &self.car_repo
    }

    fn log_calculation_count(&self) {
        let count = self.calculation_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % CALCULATION_LOG_INTERVAL == 0 {
            tracing::info!("{} *** Travel time calculations count: {} ***", API_NAME, count);
        }
    }

    pub async fn list_cars(&self) -> Result<Vec<Car>, AppError> {
        let cars = self.car_repo.find_all().await?;
        tracing::debug!("{} Listed {} cars", API_NAME, cars.len());
        Ok(cars)
    }

    pub async fn get_car(&self, id: &str) -> Result<Car, AppError> {
        self.car_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(CAR_NOT_FOUND.to_string()))
    }

    /// Stores a new car and echoes it back with its assigned id.
    pub async fn add_car(&self, input: CarInput) -> Result<Car, AppError> {
        let id = self.car_repo.create(&input).await?;
        tracing::info!("{} Created car {} ({})", API_NAME, id, input.model);
        Ok(Car::from_input(id, input))
    }

    pub async fn update_car(&self, id: &str, input: CarInput) -> Result<Car, AppError> {
        let car = self
            .car_repo
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound(CAR_NOT_FOUND.to_string()))?;
        tracing::info!("{} Updated car {}", API_NAME, id);
        Ok(car)
    }

    pub async fn delete_car(&self, id: &str) -> Result<(), AppError> {
        if !self.car_repo.delete(id).await? {
            return Err(AppError::NotFound(CAR_NOT_FOUND.to_string()));
        }
        tracing::info!("{} Deleted car {}", API_NAME, id);
        Ok(())
    }

    /// Estimates travel time with the first car whose model matches exactly,
    /// then appends the request and the response to the history tables.
    pub async fn calculate_travel_time(
        &self,
        input: TravelTimeInput,
    ) -> Result<TravelTimeResult, AppError> {
        let car = self
            .car_repo
            .find_by_model(&input.model)
            .await?
            .ok_or_else(|| AppError::NotFound(CAR_MODEL_NOT_FOUND.to_string()))?;

        let time = calculator::travel_time(input.distance, car.max_speed)
            .ok_or_else(|| AppError::Validation(TRAVEL_TIME_OUT_OF_RANGE.to_string()))?;
        tracing::info!(
            "{} Travel time for {} km with {}: {}h {}m",
            API_NAME,
            input.distance,
            car.model,
            time.hours,
            time.minutes
        );

        // Logged synchronously: a failed history write fails the request.
        self.travel_log_repo
            .record_request(input.distance, &input.model)
            .await
            .context("Failed to record travel time request")?;
        self.travel_log_repo
            .record_response(time.hours, time.minutes, &car.id)
            .await
            .context("Failed to record travel time response")?;

        self.log_calculation_count();
        Ok(TravelTimeResult::new(time, car))
    }
}
