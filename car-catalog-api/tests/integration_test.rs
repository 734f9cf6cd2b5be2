use car_catalog_api::{app, db, service::CarService};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

async fn setup_test_database() -> SqlitePool {
    db::connect_in_memory()
        .await
        .expect("Failed to open test database")
}

async fn create_test_server(pool: SqlitePool) -> SocketAddr {
    let service = CarService::new(pool);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app(service)).await.unwrap();
    });

    let mut retries = 0;
    while retries < 10 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        retries += 1;
    }

    addr
}

async fn log_row_counts(pool: &SqlitePool) -> (i64, i64) {
    let requests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM travel_time_request")
        .fetch_one(pool)
        .await
        .unwrap();
    let responses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM travel_time_response")
        .fetch_one(pool)
        .await
        .unwrap();
    (requests, responses)
}

async fn create_car(client: &Client, addr: SocketAddr, body: Value) -> Value {
    let response = client
        .post(format!("http://{}/api/cars", addr))
        .json(&body)
        .send()
        .await
        .unwrap();

    let status = response.status();
    if status != StatusCode::CREATED {
        let error_text = response.text().await.unwrap();
        panic!("Request failed with status {}: {}", status, error_text);
    }
    let body: Value = response.json().await.unwrap();
    body["data"].clone()
}

#[tokio::test]
async fn test_list_cars_on_empty_catalog_returns_empty_list() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/cars", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_create_car_should_echo_input_with_assigned_id() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let car = create_car(
        &client,
        addr,
        json!({ "model": "Tesla Model S", "maxSpeed": 322, "features": ["Autopilot"] }),
    )
    .await;

    assert!(car["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(car["model"], "Tesla Model S");
    assert_eq!(car["maxSpeed"], 322.0);
    assert_eq!(car["features"], json!(["Autopilot"]));
    assert!(car.get("year").is_none());

    let response = client
        .get(format!("http://{}/api/cars/{}", addr, car["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"], car);
}

#[tokio::test]
async fn test_create_car_with_invalid_input_should_return_400() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    for (body, message) in [
        (json!({ "model": "A", "maxSpeed": 0 }), "Max speed must be greater than 0"),
        (json!({ "model": "", "maxSpeed": 100 }), "Model is required"),
    ] {
        let response = client
            .post(format!("http://{}/api/cars", addr))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn test_malformed_json_body_should_return_400() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/cars", addr))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_get_unknown_car_should_return_404() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/cars/does-not-exist", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Car not found");
}

#[tokio::test]
async fn test_update_car_should_replace_fields() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let car = create_car(&client, addr, json!({ "model": "BMW M3", "maxSpeed": 290 })).await;
    let id = car["id"].as_str().unwrap();

    let response = client
        .put(format!("http://{}/api/cars/{}", addr, id))
        .json(&json!({
            "model": "BMW M3 Competition",
            "maxSpeed": "300",
            "features": ["Carbon Fiber", "M Performance"],
            "year": 2024
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["data"],
        json!({
            "id": id,
            "model": "BMW M3 Competition",
            "maxSpeed": 300.0,
            "features": ["Carbon Fiber", "M Performance"],
            "year": 2024
        })
    );
}

#[tokio::test]
async fn test_update_and_delete_unknown_car_should_return_404() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let response = client
        .put(format!("http://{}/api/cars/missing", addr))
        .json(&json!({ "model": "BMW M3", "maxSpeed": 290 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("http://{}/api/cars/missing", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_car_should_return_204_and_remove_it() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let car = create_car(&client, addr, json!({ "model": "Porsche 911", "maxSpeed": 330 })).await;
    let id = car["id"].as_str().unwrap();

    let response = client
        .delete(format!("http://{}/api/cars/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());

    let response = client
        .get(format!("http://{}/api/cars/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = client
        .get(format!("http://{}/api/cars", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_calculate_time_for_exact_hour() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool.clone()).await;
    let client = Client::new();

    let car = create_car(
        &client,
        addr,
        json!({ "model": "Tesla Model S", "maxSpeed": 322, "features": ["Autopilot"] }),
    )
    .await;

    let response = client
        .post(format!("http://{}/api/cars/calculate-time", addr))
        .json(&json!({ "distance": 322, "model": "Tesla Model S" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["hours"], 1);
    assert_eq!(body["data"]["minutes"], 0);
    assert_eq!(body["data"]["car"], car);

    assert_eq!(log_row_counts(&pool).await, (1, 1));
}

#[tokio::test]
async fn test_calculate_time_rounds_remaining_minutes() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    create_car(&client, addr, json!({ "model": "Toyota Camry", "maxSpeed": 220 })).await;

    let body: Value = client
        .post(format!("http://{}/api/cars/calculate-time", addr))
        .json(&json!({ "distance": 100, "model": "Toyota Camry" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["hours"], 0);
    assert_eq!(body["data"]["minutes"], 27);
}

#[tokio::test]
async fn test_calculate_time_for_unknown_model_should_return_404_without_logging() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool.clone()).await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/cars/calculate-time", addr))
        .json(&json!({ "distance": 100, "model": "DeLorean" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Car model not found");
    assert_eq!(log_row_counts(&pool).await, (0, 0));
}

#[tokio::test]
async fn test_calculate_time_with_zero_distance_should_return_400() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool.clone()).await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/cars/calculate-time", addr))
        .json(&json!({ "distance": 0, "model": "Toyota Camry" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Distance must be greater than 0");
    assert_eq!(log_row_counts(&pool).await, (0, 0));
}

#[tokio::test]
async fn test_store_failure_should_return_generic_500() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool.clone()).await;
    let client = Client::new();

    sqlx::query("DROP TABLE car").execute(&pool).await.unwrap();

    let response = client
        .get(format!("http://{}/api/cars", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_failed_history_write_should_fail_calculation_with_generic_500() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool.clone()).await;
    let client = Client::new();

    create_car(
        &client,
        addr,
        json!({ "model": "BMW M3", "maxSpeed": 290, "features": [] }),
    )
    .await;
    sqlx::query("DROP TABLE travel_time_request")
        .execute(&pool)
        .await
        .unwrap();

    let response = client
        .post(format!("http://{}/api/cars/calculate-time", addr))
        .json(&json!({ "distance": 290, "model": "BMW M3" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal server error" }));

    let responses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM travel_time_response")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(responses, 0);
}

#[tokio::test]
async fn test_calculate_time_with_unstorable_result_should_return_400() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool.clone()).await;
    let client = Client::new();

    create_car(
        &client,
        addr,
        json!({ "model": "Tractor", "maxSpeed": 1, "features": [] }),
    )
    .await;

    let response = client
        .post(format!("http://{}/api/cars/calculate-time", addr))
        .json(&json!({ "distance": 1e20, "model": "Tractor" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Distance is too large for this car");
    assert_eq!(log_row_counts(&pool).await, (0, 0));
}

#[tokio::test]
async fn test_docs_should_serve_openapi_document() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/docs", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["openapi"], "3.0.0");
    assert!(body["paths"]["/cars/calculate-time"]["post"].is_object());
}

#[tokio::test]
async fn test_health_check_should_return_ok() {
    let pool = setup_test_database().await;
    let addr = create_test_server(pool).await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}
