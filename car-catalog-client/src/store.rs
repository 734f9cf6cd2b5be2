use car_catalog_api::calculator;
use car_catalog_api::models::{Car, CarInput, TravelTimeInput, TravelTimeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::{CarBackend, HttpCarBackend};
use crate::config::ClientConfig;
use crate::error::ClientError;

const STORE_NAME: &str = "[car-store]";
const PERSIST_VERSION: u32 = 0;

/// Bounds the calculator form accepts, in km.
pub const MIN_DISTANCE_KM: f64 = 0.1;
pub const MAX_DISTANCE_KM: f64 = 5000.0;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    cars: Vec<Car>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedStore {
    state: PersistedState,
    version: u32,
}

/// In-memory car list mirroring the API, persisted to a single file.
///
/// The backend is always written first. Only a successful call patches the
/// local list; a failed one leaves it untouched and marks the store stale so
/// the next [`CarStore::refresh_if_stale`] re-fetches everything.
pub struct CarStore<B: CarBackend> {
    backend: B,
    cache_path: PathBuf,
    cars: Vec<Car>,
    stale: bool,
}

impl<B: CarBackend> CarStore<B> {
    /// Opens the store, restoring the last persisted list if there is one.
    ///
    /// An unreadable cache file is discarded: the store starts empty and
    /// stale, so the next [`CarStore::refresh_if_stale`] rebuilds it.
    pub async fn open(backend: B, cache_path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let cache_path = cache_path.into();
        let (cars, stale) = match load(&cache_path).await? {
            Some(cars) => (cars, false),
            None => (Vec::new(), true),
        };
        tracing::debug!(
            "{} Restored {} cars from {}",
            STORE_NAME,
            cars.len(),
            cache_path.display()
        );
        Ok(Self {
            backend,
            cache_path,
            cars,
            stale,
        })
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn get_car(&self, id: &str) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replaces the whole local list with the backend's.
    pub async fn fetch_cars(&mut self) -> Result<(), ClientError> {
        let cars = match self.backend.list_cars().await {
            Ok(cars) => cars,
            Err(e) => return Err(self.backend_failed("fetching cars", e)),
        };
        self.cars = cars;
        self.stale = false;
        self.persist().await
    }

    pub async fn refresh_if_stale(&mut self) -> Result<(), ClientError> {
        if self.stale {
            self.fetch_cars().await?;
        }
        Ok(())
    }

    pub async fn add_car(&mut self, input: CarInput) -> Result<Car, ClientError> {
        let car = match self.backend.add_car(&input).await {
            Ok(car) => car,
            Err(e) => return Err(self.backend_failed("adding car", e)),
        };
        self.cars.push(car.clone());
        self.persist().await?;
        Ok(car)
    }

    pub async fn update_car(&mut self, id: &str, input: CarInput) -> Result<Car, ClientError> {
        let car = match self.backend.update_car(id, &input).await {
            Ok(car) => car,
            Err(e) if e.is_not_found() => {
                // Gone on the server: drop the local copy too.
                self.cars.retain(|c| c.id != id);
                self.persist().await?;
                return Err(ClientError::CarNotFound(id.to_string()));
            }
            Err(e) => return Err(self.backend_failed("updating car", e)),
        };

        match self.cars.iter_mut().find(|c| c.id == id) {
            Some(existing) => *existing = car.clone(),
            None => self.cars.push(car.clone()),
        }
        self.persist().await?;
        Ok(car)
    }

    /// Deleting a car the server no longer has still succeeds locally.
    pub async fn delete_car(&mut self, id: &str) -> Result<(), ClientError> {
        match self.backend.delete_car(id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!("{} Car {} already deleted on server", STORE_NAME, id);
            }
            Err(e) => return Err(self.backend_failed("deleting car", e)),
        }
        self.cars.retain(|c| c.id != id);
        self.persist().await
    }

    /// Estimates travel time from the cached car, without a network call.
    pub fn estimate(&self, model: &str, distance: f64) -> Result<TravelTimeResult, ClientError> {
        if model.is_empty() {
            return Err(ClientError::Validation("Car model is required".to_string()));
        }
        if distance.is_nan() || distance < MIN_DISTANCE_KM {
            return Err(ClientError::Validation(
                "Distance must be greater than 0".to_string(),
            ));
        }
        if distance > MAX_DISTANCE_KM {
            return Err(ClientError::Validation(
                "Distance must be less than 5000 km".to_string(),
            ));
        }

        let car = self
            .cars
            .iter()
            .find(|c| c.model == model)
            .ok_or_else(|| ClientError::CarNotFound(model.to_string()))?;
        let time = calculator::travel_time(distance, car.max_speed).ok_or_else(|| {
            ClientError::Validation("Distance is too large for this car".to_string())
        })?;
        Ok(TravelTimeResult::new(time, car.clone()))
    }

    /// Asks the server for the estimate; the server also records it.
    pub async fn calculate_remote(
        &self,
        model: &str,
        distance: f64,
    ) -> Result<TravelTimeResult, ClientError> {
        self.backend
            .calculate_travel_time(&TravelTimeInput {
                distance,
                model: model.to_string(),
            })
            .await
    }

    fn backend_failed(&mut self, action: &str, err: ClientError) -> ClientError {
        tracing::error!("{} Error {}: {}", STORE_NAME, action, err);
        self.stale = true;
        err
    }

    async fn persist(&self) -> Result<(), ClientError> {
        let blob = serde_json::to_vec(&PersistedStore {
            state: PersistedState {
                cars: self.cars.clone(),
            },
            version: PERSIST_VERSION,
        })?;

        if let Some(dir) = self.cache_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = self.cache_path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob).await?;
        tokio::fs::rename(&tmp, &self.cache_path).await?;
        Ok(())
    }
}

impl CarStore<HttpCarBackend> {
    pub async fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::open(HttpCarBackend::new(config.api_url.clone()), config.cache_path()).await
    }
}

/// `None` means the file exists but does not hold a store we can read.
async fn load(path: &Path) -> Result<Option<Vec<Car>>, ClientError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Some(Vec::new())),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice::<PersistedStore>(&bytes) {
        Ok(stored) => Ok(Some(stored.state.cars)),
        Err(e) => {
            tracing::warn!(
                "{} Discarding unreadable cache {}: {}",
                STORE_NAME,
                path.display(),
                e
            );
            Ok(None)
        }
    }
}
