//! Client-side mirror of the car catalog.
//!
//! [`CarStore`] keeps the full car list in memory, persists it to a single
//! JSON blob on disk and writes every mutation through to the API first.

pub mod backend;
pub mod config;
pub mod error;
pub mod store;

pub use backend::{CarBackend, HttpCarBackend};
pub use config::ClientConfig;
pub use error::ClientError;
pub use store::CarStore;
