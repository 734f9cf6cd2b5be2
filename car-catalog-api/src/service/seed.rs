use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::CarInput;

use super::CarService;

const DEMO_CARS: [(&str, f64, [&str; 4]); 5] = [
    (
        "Tesla Model S",
        322.0,
        ["Autopilot", "Electric", "Luxury Interior", "Long Range"],
    ),
    (
        "Porsche 911",
        330.0,
        ["Sport Mode", "Leather Seats", "PDK Transmission", "Launch Control"],
    ),
    (
        "Toyota Camry",
        220.0,
        ["Hybrid", "Safety Sense", "Apple CarPlay", "Android Auto"],
    ),
    (
        "BMW M3",
        290.0,
        ["M Performance", "Carbon Fiber", "Sport Suspension", "Premium Audio"],
    ),
    (
        "Audi e-tron GT",
        245.0,
        ["Electric", "Quattro", "Matrix LED", "Virtual Cockpit"],
    ),
];

pub fn demo_cars() -> Vec<CarInput> {
    DEMO_CARS
        .iter()
        .map(|(model, max_speed, features)| CarInput {
            model: model.to_string(),
            max_speed: *max_speed,
            features: features.iter().map(|f| f.to_string()).collect(),
            year: None,
        })
        .collect()
}

impl CarService {
    /// Inserts the demo catalog when the car table is empty. Returns how many
    /// cars were added.
    pub async fn seed_demo_data(&self) -> Result<usize, AppError> {
        if self.repository().count().await? > 0 {
            tracing::info!("{} Catalog not empty, skipping demo data", API_NAME);
            return Ok(0);
        }

        let cars = demo_cars();
        for car in &cars {
            self.repository().create(car).await?;
        }
        tracing::info!("{} Seeded {} demo cars", API_NAME, cars.len());
        Ok(cars.len())
    }
}
