use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::service::CarService;

pub fn router() -> Router<CarService> {
    Router::new().route("/docs", get(openapi_document))
}

async fn openapi_document() -> Json<Value> {
    Json(openapi())
}

fn data_of(schema: Value) -> Value {
    json!({
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": { "data": schema }
                }
            }
        }
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" }
            }
        }
    })
}

fn json_body(schema_ref: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": schema_ref }
            }
        }
    })
}

fn with_description(mut response: Value, description: &str) -> Value {
    response["description"] = json!(description);
    response
}

fn id_parameter() -> Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    }])
}

/// OpenAPI 3.0 description of every endpoint under `/api`.
pub fn openapi() -> Value {
    let car_ref = json!({ "$ref": "#/components/schemas/Car" });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Car Travel Calculator API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API for managing cars and calculating travel times"
        },
        "servers": [{ "url": "/api", "description": "API server" }],
        "paths": {
            "/cars": {
                "get": {
                    "summary": "Get all cars",
                    "responses": {
                        "200": with_description(
                            data_of(json!({ "type": "array", "items": car_ref })),
                            "List of cars"
                        ),
                        "500": error_response("Store unavailable")
                    }
                },
                "post": {
                    "summary": "Create a new car",
                    "requestBody": json_body("#/components/schemas/CarInput"),
                    "responses": {
                        "201": with_description(data_of(car_ref.clone()), "Car created successfully"),
                        "400": error_response("Invalid input")
                    }
                }
            },
            "/cars/{id}": {
                "get": {
                    "summary": "Get a specific car",
                    "parameters": id_parameter(),
                    "responses": {
                        "200": with_description(data_of(car_ref.clone()), "Car details"),
                        "404": error_response("Car not found")
                    }
                },
                "put": {
                    "summary": "Update a car",
                    "parameters": id_parameter(),
                    "requestBody": json_body("#/components/schemas/CarInput"),
                    "responses": {
                        "200": with_description(data_of(car_ref.clone()), "Car updated successfully"),
                        "400": error_response("Invalid input"),
                        "404": error_response("Car not found")
                    }
                },
                "delete": {
                    "summary": "Delete a car",
                    "parameters": id_parameter(),
                    "responses": {
                        "204": { "description": "Car deleted successfully" },
                        "404": error_response("Car not found")
                    }
                }
            },
            "/cars/calculate-time": {
                "post": {
                    "summary": "Calculate travel time",
                    "requestBody": json_body("#/components/schemas/TravelTimeRequest"),
                    "responses": {
                        "200": with_description(
                            data_of(json!({ "$ref": "#/components/schemas/TravelTimeResponse" })),
                            "Travel time calculation result"
                        ),
                        "400": error_response("Invalid input"),
                        "404": error_response("Car model not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health check",
                    "responses": { "200": { "description": "Service is healthy" } }
                }
            }
        },
        "components": {
            "schemas": {
                "Car": {
                    "type": "object",
                    "required": ["id", "model", "maxSpeed", "features"],
                    "properties": {
                        "id": { "type": "string" },
                        "model": { "type": "string" },
                        "maxSpeed": { "type": "number", "minimum": 1 },
                        "features": { "type": "array", "items": { "type": "string" } },
                        "year": { "type": "integer" }
                    }
                },
                "CarInput": {
                    "type": "object",
                    "required": ["model", "maxSpeed"],
                    "properties": {
                        "model": { "type": "string", "minLength": 1 },
                        "maxSpeed": { "type": "number", "minimum": 1 },
                        "features": { "type": "array", "items": { "type": "string" }, "default": [] },
                        "year": { "type": "integer" }
                    }
                },
                "TravelTimeRequest": {
                    "type": "object",
                    "required": ["distance", "model"],
                    "properties": {
                        "distance": { "type": "number", "minimum": 0.1 },
                        "model": { "type": "string", "minLength": 1 }
                    }
                },
                "TravelTimeResponse": {
                    "type": "object",
                    "properties": {
                        "hours": { "type": "integer", "minimum": 0 },
                        "minutes": { "type": "integer", "minimum": 0, "maximum": 59 },
                        "car": car_ref
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}
