//! # Remote Source
//!
//! The seam between the cache and the network. A [`RemoteSource`] performs one
//! outbound call per method and never fails past its boundary: every outcome,
//! including transport errors, comes back as an [`ApiResponse`] envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::framework::Resource;

/// Uniform result envelope for every remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Success without a payload (e.g. `204 No Content`).
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Unwraps the payload; a failure, or a success without data, becomes
    /// `Err` carrying the server message or `fallback`.
    pub fn into_result(self, fallback: &str) -> Result<T, String> {
        match self {
            Self {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            Self { error, .. } => Err(error.unwrap_or_else(|| fallback.to_string())),
        }
    }

    /// Like [`into_result`](Self::into_result) but only `success` matters.
    pub fn into_unit_result(self, fallback: &str) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self.error.unwrap_or_else(|| fallback.to_string()))
        }
    }
}

/// Domain operations against a remote collection of `T`.
#[async_trait]
pub trait RemoteSource<T: Resource>: Send + Sync + 'static {
    async fn list_all(&self) -> ApiResponse<Vec<T>>;

    async fn get_one(&self, id: T::Id) -> ApiResponse<T>;

    async fn create(&self, params: T::Create) -> ApiResponse<T>;

    async fn update(&self, id: T::Id, update: T::Update) -> ApiResponse<T>;

    async fn delete(&self, id: T::Id) -> ApiResponse<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_prefers_server_message() {
        let failed: ApiResponse<u32> = ApiResponse::failure("Restaurant not found");
        assert_eq!(failed.into_result("fallback"), Err("Restaurant not found".to_string()));
    }

    #[test]
    fn test_into_result_requires_data() {
        let empty: ApiResponse<u32> = ApiResponse::empty();
        assert_eq!(
            empty.into_result("Failed to fetch restaurants"),
            Err("Failed to fetch restaurants".to_string())
        );
        assert_eq!(ApiResponse::<u32>::empty().into_unit_result("x"), Ok(()));
    }

    #[test]
    fn test_failure_without_message_uses_fallback() {
        let bare = ApiResponse::<()> {
            success: false,
            data: None,
            error: None,
        };
        assert_eq!(
            bare.into_unit_result("Failed to delete restaurant"),
            Err("Failed to delete restaurant".to_string())
        );
    }
}
