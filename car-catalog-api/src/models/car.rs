use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A catalog entry. `max_speed` is in km/h and always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub model: String,
    pub max_speed: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Car {
    pub fn from_input(id: impl Into<String>, input: CarInput) -> Self {
        Self {
            id: id.into(),
            model: input.model,
            max_speed: input.max_speed,
            features: input.features,
            year: input.year,
        }
    }

    /// Replaces every field except `id`.
    pub fn apply(&mut self, input: CarInput) {
        self.model = input.model;
        self.max_speed = input.max_speed;
        self.features = input.features;
        self.year = input.year;
    }
}

/// Everything a client may set on a car; the id is always server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1.0, message = "Max speed must be greater than 0"))]
    pub max_speed: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_features"))]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

fn validate_features(features: &[String]) -> Result<(), ValidationError> {
    if features.iter().any(|f| f.is_empty()) {
        let mut err = ValidationError::new("empty_feature");
        err.message = Some("Features cannot contain empty values".into());
        return Err(err);
    }
    Ok(())
}
