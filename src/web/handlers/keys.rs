use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app::AppState;
use crate::web::session::SessionPartner;

#[derive(Deserialize)]
pub struct CreateKeyRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct CreateKeyResponse {
    pub id: String,
    pub name: String,
    pub key: String, // Only returned once on creation
    pub created_at: String,
}

/// Create a new API key
pub async fn create_key(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
    Json(req): Json<CreateKeyRequest>,
) -> impl IntoResponse {
    match state.keys.generate(&partner_id, &req.name).await {
        Ok(issued) => {
            let response = CreateKeyResponse {
                id: issued.record.id,
                name: issued.record.name,
                key: issued.secret, // Return plaintext secret only once
                created_at: issued.record.created_at,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List API keys for the current partner
pub async fn list_keys(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
) -> impl IntoResponse {
    match state.keys.list(&partner_id).await {
        Ok(keys) => {
            // Don't expose secret_hash to clients
            let items: Vec<_> = keys
                .into_iter()
                .map(|k| {
                    json!({
                        "id": k.id,
                        "name": k.name,
                        "revoked": k.revoked,
                        "created_at": k.created_at,
                    })
                })
                .collect();
            Json(json!({ "items": items })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Revoke an API key. Safe to repeat; a revoked key never comes back.
pub async fn revoke_key(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
    Path(key_id): Path<String>,
) -> impl IntoResponse {
    match state.keys.revoke(&partner_id, &key_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a revoked API key
pub async fn delete_key(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
    Path(key_id): Path<String>,
) -> impl IntoResponse {
    match state.keys.delete(&partner_id, &key_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
