use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tower_cookies::Cookies;

use crate::app::AppState;
use crate::auth::session;
use crate::error::ServiceError;
use crate::web::session::SessionPartner;

pub async fn me(SessionPartner { partner_id }: SessionPartner) -> impl IntoResponse {
    Json(json!({ "partner_id": partner_id }))
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    session::clear_session(&cookies, &state.cookie_key);
    StatusCode::NO_CONTENT
}

/// The current partner's profile
pub async fn get_account(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
) -> impl IntoResponse {
    match state.store.get_partner(&partner_id).await {
        Ok(Some(partner)) => Json(partner).into_response(),
        Ok(None) => ServiceError::NotFound.into_response(),
        Err(e) => ServiceError::Store(e).into_response(),
    }
}

#[derive(Deserialize)]
pub struct UpdateAccountRequest {
    pub company_name: String,
}

/// Update the company name. Email is owned by the identity layer and
/// cannot be changed here.
pub async fn update_account(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
    Json(req): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let company_name = req.company_name.trim();
    if company_name.is_empty() {
        return ServiceError::Validation("company_name must not be empty".into()).into_response();
    }
    match state
        .store
        .update_partner_company_name(&partner_id, company_name)
        .await
    {
        Ok(0) => ServiceError::NotFound.into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ServiceError::Store(e).into_response(),
    }
}

/// Delete the partner account along with all of its API keys and
/// formation records, then drop the session.
pub async fn delete_account(
    State(state): State<AppState>,
    cookies: Cookies,
    SessionPartner { partner_id }: SessionPartner,
) -> impl IntoResponse {
    match state.store.get_partner(&partner_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ServiceError::NotFound.into_response(),
        Err(e) => return ServiceError::Store(e).into_response(),
    }
    match state.store.delete_partner_account(&partner_id).await {
        Ok(()) => {
            session::clear_session(&cookies, &state.cookie_key);
            tracing::info!(partner_id = %partner_id, "deleted partner account");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => ServiceError::Store(e).into_response(),
    }
}
