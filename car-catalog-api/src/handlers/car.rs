use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::service::CarService;
use crate::validation::{parse_car_input, parse_travel_time_input};

pub fn router() -> Router<CarService> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/calculate-time", post(calculate_time))
        .route("/cars/{id}", get(get_car).put(update_car).delete(delete_car))
}

async fn list_cars(State(service): State<CarService>) -> Result<Json<Value>, AppError> {
    let cars = service.list_cars().await?;
    Ok(Json(json!({ "data": cars })))
}

async fn get_car(
    State(service): State<CarService>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let car = service.get_car(&id).await?;
    Ok(Json(json!({ "data": car })))
}

async fn create_car(
    State(service): State<CarService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = body?;
    let input = parse_car_input(&body)?;

    tracing::info!("{} Received new car: {}", API_NAME, input.model);

    let car = service.add_car(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": car }))))
}

async fn update_car(
    State(service): State<CarService>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let input = parse_car_input(&body)?;

    let car = service.update_car(&id, input).await?;
    Ok(Json(json!({ "data": car })))
}

async fn delete_car(
    State(service): State<CarService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_car(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn calculate_time(
    State(service): State<CarService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let input = parse_travel_time_input(&body)?;

    let result = service.calculate_travel_time(input).await?;
    Ok(Json(json!({ "data": result })))
}
