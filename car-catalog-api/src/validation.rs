//! Request body validation.
//!
//! Bodies arrive as raw JSON so numeric fields can be coerced before the
//! `validator` rules run. Only the first failing rule, in field order, is
//! reported.

use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::models::{CarInput, TravelTimeInput};

const CAR_INPUT_FIELDS: [&str; 4] = ["model", "max_speed", "features", "year"];
const TRAVEL_TIME_FIELDS: [&str; 2] = ["distance", "model"];

type Issue = (&'static str, String);

pub fn parse_car_input(body: &Value) -> Result<CarInput, AppError> {
    let object = as_object(body)?;
    let mut issues: Vec<Issue> = Vec::new();

    let model = required_string(object, "model")
        .unwrap_or_else(|msg| record(&mut issues, "model", msg, String::new()));
    let max_speed = required_number(object, "maxSpeed")
        .unwrap_or_else(|msg| record(&mut issues, "max_speed", msg, 0.0));
    let features = string_list(object, "features")
        .unwrap_or_else(|msg| record(&mut issues, "features", msg, Vec::new()));
    let year = optional_year(object, "year")
        .unwrap_or_else(|msg| record(&mut issues, "year", msg, None));

    let input = CarInput {
        model,
        max_speed,
        features,
        year,
    };
    match first_issue(&CAR_INPUT_FIELDS, &issues, input.validate()) {
        Some(msg) => Err(AppError::Validation(msg)),
        None => Ok(input),
    }
}

pub fn parse_travel_time_input(body: &Value) -> Result<TravelTimeInput, AppError> {
    let object = as_object(body)?;
    let mut issues: Vec<Issue> = Vec::new();

    // Distance is not coerced: it must already be a JSON number.
    let distance = match object.get("distance") {
        None => Err("Required".to_string()),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(nan_message),
        Some(other) => Err(expected("number", other)),
    }
    .unwrap_or_else(|msg| record(&mut issues, "distance", msg, 0.0));
    let model = required_string(object, "model")
        .unwrap_or_else(|msg| record(&mut issues, "model", msg, String::new()));

    let input = TravelTimeInput { distance, model };
    match first_issue(&TRAVEL_TIME_FIELDS, &issues, input.validate()) {
        Some(msg) => Err(AppError::Validation(msg)),
        None => Ok(input),
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::Validation(expected("object", body)))
}

fn record<T>(issues: &mut Vec<Issue>, field: &'static str, msg: String, placeholder: T) -> T {
    issues.push((field, msg));
    placeholder
}

fn first_issue(
    fields: &[&'static str],
    coercion_issues: &[Issue],
    validated: Result<(), ValidationErrors>,
) -> Option<String> {
    let rule_errors = validated.err();
    for field in fields {
        if let Some((_, msg)) = coercion_issues.iter().find(|(name, _)| name == field) {
            return Some(msg.clone());
        }
        let first_rule = rule_errors
            .as_ref()
            .and_then(|errors| errors.field_errors().get(*field).and_then(|errs| errs.first().cloned()));
        if let Some(err) = first_rule {
            return Some(rule_message(&err));
        }
    }
    None
}

fn rule_message(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(kind: &str, got: &Value) -> String {
    format!("Expected {}, received {}", kind, type_name(got))
}

fn nan_message() -> String {
    "Expected number, received nan".to_string()
}

fn required_string(object: &Map<String, Value>, key: &str) -> Result<String, String> {
    match object.get(key) {
        None => Err("Required".to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(expected("string", other)),
    }
}

/// Coerces a JSON value to a finite number: numeric strings are parsed,
/// booleans become 0/1 and null or an empty string become 0.
fn coerce_number(value: &Value) -> Result<f64, String> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    };
    n.filter(|n| n.is_finite()).ok_or_else(nan_message)
}

fn required_number(object: &Map<String, Value>, key: &str) -> Result<f64, String> {
    match object.get(key) {
        None => Err("Required".to_string()),
        Some(value) => coerce_number(value),
    }
}

fn string_list(object: &Map<String, Value>, key: &str) -> Result<Vec<String>, String> {
    match object.get(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(expected("string", other)),
            })
            .collect(),
        Some(other) => Err(expected("array", other)),
    }
}

fn optional_year(object: &Map<String, Value>, key: &str) -> Result<Option<i32>, String> {
    let value = match object.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(value) => coerce_number(value)?,
    };
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err("Year must be a whole number".to_string());
    }
    Ok(Some(value as i32))
}
