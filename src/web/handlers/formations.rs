use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::error::ServiceError;
use crate::models::formation::FormationStatus;
use crate::web::session::SessionPartner;

#[derive(Deserialize)]
pub struct ListFormationsQuery {
    pub status: Option<String>,
}

/// List the partner's formations, newest first, optionally filtered by
/// status. The filter runs in the store query, not on the fetched rows.
pub async fn list_formations(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
    Query(query): Query<ListFormationsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<FormationStatus>() {
            Ok(status) => Some(status),
            Err(e) => return ServiceError::Validation(e).into_response(),
        },
    };
    match state
        .store
        .list_formations(&partner_id, status.map(|s| s.as_str()))
        .await
    {
        Ok(rows) => Json(json!({ "items": rows })).into_response(),
        Err(e) => ServiceError::Store(e).into_response(),
    }
}

/// Dashboard overview stats: formation counts plus active key count.
pub async fn overview(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
) -> impl IntoResponse {
    let counts = match state.store.count_formations(&partner_id).await {
        Ok(counts) => counts,
        Err(e) => return ServiceError::Store(e).into_response(),
    };
    let active_api_keys = match state.store.count_active_api_keys(&partner_id).await {
        Ok(n) => n,
        Err(e) => return ServiceError::Store(e).into_response(),
    };
    Json(json!({
        "formations": counts,
        "active_api_keys": active_api_keys,
    }))
    .into_response()
}
