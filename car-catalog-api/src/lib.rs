pub mod calculator;
pub mod models;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod constants;
#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod service;
#[cfg(feature = "server")]
pub mod validation;

/// The full HTTP surface, mounted under `/api`.
#[cfg(feature = "server")]
pub fn app(service: service::CarService) -> axum::Router {
    use axum::Router;
    use handlers::{car, docs, health};
    use tower_http::{cors::CorsLayer, trace::TraceLayer};

    let api = car::router()
        .merge(docs::router())
        .merge(health::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
