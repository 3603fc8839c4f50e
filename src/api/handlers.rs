//! API Handlers
//!
//! HTTP request handlers for the store endpoint. Collection requests answer
//! with a single envelope; object requests answer with one envelope per key.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::config::{Config, ServerConfig};
use crate::error::{Result, StoreError};
use crate::models::{ApiResponse, CollectionInfo, HealthResponse, RequestType, StoreRequest};
use crate::storage::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared object store
    pub store: Arc<Store>,
    /// Server settings (auth credentials, request timeout)
    pub server: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new AppState with the given store and default server settings.
    pub fn new(store: Store) -> Self {
        Self::with_server(Arc::new(store), ServerConfig::default())
    }

    pub fn with_server(store: Arc<Store>, server: ServerConfig) -> Self {
        Self {
            store,
            server: Arc::new(server),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = Store::new(config.storage.clone());
        Self::with_server(Arc::new(store), config.server.clone())
    }
}

/// Handler for POST and PUT /
///
/// Creates a collection or stores objects.
pub async fn set_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StoreRequest>, JsonRejection>,
) -> Result<Response> {
    let req = parse(payload)?;

    match req.kind {
        RequestType::Collection => {
            state.store.new_collection(&req.collection).await?;
            Ok(Json(ApiResponse::ok()).into_response())
        }
        RequestType::Object => {
            let objects = req.object_settings();
            if objects.is_empty() {
                return Err(StoreError::InvalidRequest(
                    "request must carry an object with its key or a map of objects".to_string(),
                ));
            }

            let mut responses = Vec::with_capacity(objects.len());
            for (key, settings) in objects {
                let result = match require_key(&key) {
                    Ok(()) => state
                        .store
                        .set_object(&req.collection, &key, settings)
                        .await
                        .map(|_| None),
                    Err(e) => Err(e),
                };
                responses.push(ApiResponse::from_result(result));
            }
            Ok(Json(responses).into_response())
        }
        RequestType::Unknown => Err(unknown_type()),
    }
}

/// Handler for GET /
///
/// Describes a collection or reads objects.
pub async fn get_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StoreRequest>, JsonRejection>,
) -> Result<Response> {
    let req = parse(payload)?;

    match req.kind {
        RequestType::Collection => {
            let collection = state.store.get_collection(&req.collection).await?;
            let info = CollectionInfo::describe(&collection).await;
            Ok(Json(ApiResponse::with_data(info.to_bytes())).into_response())
        }
        RequestType::Object => {
            let keys = object_keys(&req)?;

            let mut responses = Vec::with_capacity(keys.len());
            for key in keys {
                let result = state
                    .store
                    .get_object(&req.collection, &key)
                    .await
                    .map(|object| Some(object.data().to_vec()));
                responses.push(ApiResponse::from_result(result));
            }
            Ok(Json(responses).into_response())
        }
        RequestType::Unknown => Err(unknown_type()),
    }
}

/// Handler for DELETE /
///
/// Deletes a collection or objects.
pub async fn delete_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StoreRequest>, JsonRejection>,
) -> Result<Response> {
    let req = parse(payload)?;

    match req.kind {
        RequestType::Collection => {
            state.store.delete_collection(&req.collection).await?;
            Ok(Json(ApiResponse::ok()).into_response())
        }
        RequestType::Object => {
            let keys = object_keys(&req)?;

            let mut responses = Vec::with_capacity(keys.len());
            for key in keys {
                let result = state
                    .store
                    .delete_object(&req.collection, &key)
                    .await
                    .map(|_| None);
                responses.push(ApiResponse::from_result(result));
            }
            Ok(Json(responses).into_response())
        }
        RequestType::Unknown => Err(unknown_type()),
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

fn parse(payload: std::result::Result<Json<StoreRequest>, JsonRejection>) -> Result<StoreRequest> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| StoreError::InvalidRequest(rejection.body_text()))
}

fn object_keys(req: &StoreRequest) -> Result<Vec<String>> {
    let keys = req.object_keys();
    if keys.is_empty() {
        return Err(StoreError::InvalidRequest(
            "request must name at least one key".to_string(),
        ));
    }
    Ok(keys)
}

fn require_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidRequest("key cannot be empty".to_string()));
    }
    Ok(())
}

fn unknown_type() -> StoreError {
    StoreError::InvalidRequest("unknown type, expected 'object' or 'collection'".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::storage::RequestSettings;

    fn test_state() -> AppState {
        AppState::new(Store::new(StorageConfig::default()))
    }

    fn request(kind: RequestType, collection: &str) -> StoreRequest {
        StoreRequest {
            kind,
            collection: collection.to_string(),
            ..StoreRequest::default()
        }
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let state = test_state();

        let result = set_handler(
            State(state.clone()),
            Ok(Json(request(RequestType::Collection, "test"))),
        )
        .await;
        assert!(result.is_ok());
        assert!(state.store.get_collection("test").await.is_ok());

        let result = delete_handler(
            State(state.clone()),
            Ok(Json(request(RequestType::Collection, "test"))),
        )
        .await;
        assert!(result.is_ok());

        let result = get_handler(
            State(state),
            Ok(Json(request(RequestType::Collection, "test"))),
        )
        .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_and_get_objects() {
        let state = test_state();

        let mut set = request(RequestType::Object, "");
        set.objects.insert("1".to_string(), RequestSettings::new("one"));
        set_handler(State(state.clone()), Ok(Json(set))).await.unwrap();

        let object = state.store.get_object("", "1").await.unwrap();
        assert_eq!(object.data(), b"one");
    }

    #[tokio::test]
    async fn test_set_without_objects_is_invalid() {
        let result = set_handler(
            State(test_state()),
            Ok(Json(request(RequestType::Object, ""))),
        )
        .await;
        assert!(matches!(result, Err(StoreError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_get_without_keys_is_invalid() {
        let result = get_handler(
            State(test_state()),
            Ok(Json(request(RequestType::Object, ""))),
        )
        .await;
        assert!(matches!(result, Err(StoreError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let result = delete_handler(
            State(test_state()),
            Ok(Json(request(RequestType::Unknown, ""))),
        )
        .await;
        assert!(matches!(result, Err(StoreError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_default_collection_rejected() {
        let result = delete_handler(
            State(test_state()),
            Ok(Json(request(RequestType::Collection, ""))),
        )
        .await;
        assert!(matches!(result, Err(StoreError::ProtectedResource(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
