//! # REST Client
//!
//! [`RestaurantApi`] talks to the `/restaurants` resource over HTTP and wraps
//! every outcome in an [`ApiResponse`] envelope. No call returns `Err` or
//! panics: transport failures, non-2xx statuses and malformed bodies all come
//! back as `ApiResponse { success: false, error: Some(..) }`.
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | List | `GET` | `/restaurants` |
//! | Get one | `GET` | `/restaurants/{id}` |
//! | Create | `POST` | `/restaurants` |
//! | Update | `PATCH` | `/restaurants/{id}` |
//! | Delete | `DELETE` | `/restaurants/{id}` |

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::framework::{ApiResponse, RemoteSource};
use crate::model::{RestaurantDraft, RestaurantId, RestaurantPatch, RestaurantRecord};

/// Error body of a rejected request. Only a string `detail` is used.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// HTTP implementation of [`RemoteSource`] for restaurants.
#[derive(Debug, Clone)]
pub struct RestaurantApi {
    client: Client,
    endpoint: String,
}

impl RestaurantApi {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn item_url(&self, id: RestaurantId) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    async fn send(request: RequestBuilder) -> Result<Response, String> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Request failed");
                e.to_string()
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Response");
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.detail)
            .and_then(|detail| detail.as_str().map(str::to_string))
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
            });
        warn!(status = status.as_u16(), %message, "Request rejected");
        Err(message)
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> ApiResponse<T> {
        let response = match Self::send(request).await {
            Ok(response) => response,
            Err(message) => return ApiResponse::failure(message),
        };
        if response.status() == StatusCode::NO_CONTENT {
            return ApiResponse::empty();
        }
        match response.json::<T>().await {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => {
                warn!(error = %e, "Malformed response body");
                ApiResponse::failure(e.to_string())
            }
        }
    }
}

#[async_trait]
impl RemoteSource<RestaurantRecord> for RestaurantApi {
    #[instrument(name = "api", skip_all, fields(method = "GET"))]
    async fn list_all(&self) -> ApiResponse<Vec<RestaurantRecord>> {
        Self::fetch(self.client.get(&self.endpoint)).await
    }

    #[instrument(name = "api", skip_all, fields(method = "GET", id = %id))]
    async fn get_one(&self, id: RestaurantId) -> ApiResponse<RestaurantRecord> {
        Self::fetch(self.client.get(self.item_url(id))).await
    }

    #[instrument(name = "api", skip_all, fields(method = "POST"))]
    async fn create(&self, params: RestaurantDraft) -> ApiResponse<RestaurantRecord> {
        Self::fetch(self.client.post(&self.endpoint).json(&params)).await
    }

    #[instrument(name = "api", skip_all, fields(method = "PATCH", id = %id))]
    async fn update(&self, id: RestaurantId, update: RestaurantPatch) -> ApiResponse<RestaurantRecord> {
        Self::fetch(self.client.patch(self.item_url(id)).json(&update)).await
    }

    /// Any 2xx counts as success; a body, if present, is ignored.
    #[instrument(name = "api", skip_all, fields(method = "DELETE", id = %id))]
    async fn delete(&self, id: RestaurantId) -> ApiResponse<()> {
        match Self::send(self.client.delete(self.item_url(id))).await {
            Ok(_) => ApiResponse::empty(),
            Err(message) => ApiResponse::failure(message),
        }
    }
}
