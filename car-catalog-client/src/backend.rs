use async_trait::async_trait;
use car_catalog_api::models::{Car, CarInput, TravelTimeInput, TravelTimeResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;

/// Where the store writes through to.
#[async_trait]
pub trait CarBackend: Send + Sync {
    async fn list_cars(&self) -> Result<Vec<Car>, ClientError>;
    async fn add_car(&self, input: &CarInput) -> Result<Car, ClientError>;
    async fn update_car(&self, id: &str, input: &CarInput) -> Result<Car, ClientError>;
    async fn delete_car(&self, id: &str) -> Result<(), ClientError>;
    async fn calculate_travel_time(
        &self,
        input: &TravelTimeInput,
    ) -> Result<TravelTimeResult, ClientError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<String>,
}

/// Talks to the REST API, e.g. `http://localhost:8080/api`.
#[derive(Clone)]
pub struct HttpCarBackend {
    client: Client,
    base_url: String,
}

impl HttpCarBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn unwrap_data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            if status.is_success() {
                ClientError::Http(e)
            } else {
                ClientError::Api {
                    status: status.as_u16(),
                    message: status.to_string(),
                }
            }
        })?;

        match (status.is_success(), envelope.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .unwrap_or_else(|| "Missing data in response".to_string()),
            }),
        }
    }
}

#[async_trait]
impl CarBackend for HttpCarBackend {
    async fn list_cars(&self) -> Result<Vec<Car>, ClientError> {
        let response = self.client.get(self.url("/cars")).send().await?;
        Self::unwrap_data(response).await
    }

    async fn add_car(&self, input: &CarInput) -> Result<Car, ClientError> {
        let response = self
            .client
            .post(self.url("/cars"))
            .json(input)
            .send()
            .await?;
        Self::unwrap_data(response).await
    }

    async fn update_car(&self, id: &str, input: &CarInput) -> Result<Car, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/cars/{}", id)))
            .json(input)
            .send()
            .await?;
        Self::unwrap_data(response).await
    }

    async fn delete_car(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/cars/{}", id)))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status().as_u16();
        let message = response
            .json::<Envelope<()>>()
            .await
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| "Failed to delete car".to_string());
        Err(ClientError::Api { status, message })
    }

    async fn calculate_travel_time(
        &self,
        input: &TravelTimeInput,
    ) -> Result<TravelTimeResult, ClientError> {
        let response = self
            .client
            .post(self.url("/cars/calculate-time"))
            .json(input)
            .send()
            .await?;
        Self::unwrap_data(response).await
    }
}
