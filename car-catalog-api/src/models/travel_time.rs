use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Car;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TravelTimeInput {
    #[validate(range(min = 0.1, message = "Distance must be greater than 0"))]
    pub distance: f64,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
}

/// Whole hours plus leftover minutes, `minutes` in `0..60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTime {
    pub hours: u64,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeResult {
    pub hours: u64,
    pub minutes: u32,
    pub car: Car,
}

impl TravelTimeResult {
    pub fn new(time: TravelTime, car: Car) -> Self {
        Self {
            hours: time.hours,
            minutes: time.minutes,
            car,
        }
    }
}
