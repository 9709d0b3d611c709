//! Reference HTTP/JSON binding for the storage-and-transform service.
//!
//! Two endpoints: `POST /store` uploads a (token, wrapped key, payload)
//! triple under a client-chosen id, `POST /request` returns the transformed
//! key and payload for an id. All binary fields travel as standard base64
//! with padding. The transport is deliberately thin; authentication,
//! tenancy and retention live above it.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::curve::{self, G1_BYTES, GT_BYTES};
use crate::err::{Error, Result};
use crate::store::ProxyStore;

/// Body of `POST /store`.
#[derive(Debug, Deserialize)]
pub struct StoreRequest {
    /// Base64 of the raw (128-byte) G2 delegation token.
    pub reencryption_key: String,
    /// Components of the second-level wrapped key.
    pub encrypted_key: EncryptedKeyParts,
    /// Base64 of the sealed payload.
    pub encrypted_data: String,
    /// Identifier the entry is stored under.
    pub user_id: String,
}

/// The two components of a second-level wrapped key, individually base64.
#[derive(Debug, Deserialize)]
pub struct EncryptedKeyParts {
    /// Compressed (32-byte) G1 component.
    pub first: String,
    /// Target group (384-byte) component.
    pub second: String,
}

/// Body of `POST /request`.
#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    /// Identifier previously passed to `/store`.
    pub request_id: String,
}

#[derive(Debug, Serialize)]
struct StoreResponse {
    status: &'static str,
    id: String,
}

#[derive(Debug, Serialize)]
struct FirstLevelKeyParts {
    first: String,
    second: String,
}

#[derive(Debug, Serialize)]
struct TransformResponse {
    first_level_key: FirstLevelKeyParts,
    encrypted_data: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Builds the service router over a shared store.
pub fn router(store: Arc<ProxyStore>) -> Router {
    Router::new()
        .route("/store", post(handle_store))
        .route("/request", post(handle_request))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

async fn handle_store(
    State(store): State<Arc<ProxyStore>>,
    Json(req): Json<StoreRequest>,
) -> Response {
    let stored = decode_store_request(&req)
        .and_then(|(rekey, key, data)| store.store(&req.user_id, &rekey, &key, data));
    match stored {
        Ok(id) => (
            StatusCode::OK,
            Json(StoreResponse {
                status: "success",
                id,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

async fn handle_request(
    State(store): State<Arc<ProxyStore>>,
    Json(req): Json<TransformRequest>,
) -> Response {
    match store.request(&req.request_id) {
        Ok((key, data)) => (
            StatusCode::OK,
            Json(TransformResponse {
                first_level_key: FirstLevelKeyParts {
                    first: BASE64.encode(curve::gt_to_bytes(&key.first)),
                    second: BASE64.encode(curve::gt_to_bytes(&key.second)),
                },
                encrypted_data: BASE64.encode(&data),
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

fn decode_store_request(req: &StoreRequest) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let rekey = decode_base64(&req.reencryption_key)?;

    let first = decode_base64(&req.encrypted_key.first)?;
    if first.len() != G1_BYTES {
        return Err(Error::InvalidEncoding(format!(
            "encrypted_key.first must be {G1_BYTES} bytes, got {}",
            first.len()
        )));
    }
    let second = decode_base64(&req.encrypted_key.second)?;
    if second.len() != GT_BYTES {
        return Err(Error::InvalidEncoding(format!(
            "encrypted_key.second must be {GT_BYTES} bytes, got {}",
            second.len()
        )));
    }
    let mut key = first;
    key.extend_from_slice(&second);

    let data = decode_base64(&req.encrypted_data)?;
    Ok((rekey, key, data))
}

fn decode_base64(value: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| Error::InvalidEncoding(format!("malformed base64: {e}")))
}

fn error_response(err: Error) -> Response {
    let status = match err {
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::Rng(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    if status.is_server_error() {
        warn!(%err, "request failed server-side");
    }
    (status, Json(ErrorResponse {
        error: err.to_string(),
    }))
        .into_response()
}
