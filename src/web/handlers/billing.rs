use axum::{extract::State, response::IntoResponse, Json};
use time::OffsetDateTime;

use crate::app::AppState;
use crate::billing;
use crate::error::ServiceError;
use crate::web::session::SessionPartner;

/// Billing summary for the current calendar month.
pub async fn billing_summary(
    State(state): State<AppState>,
    SessionPartner { partner_id }: SessionPartner,
) -> impl IntoResponse {
    let since = billing::month_start_rfc3339(OffsetDateTime::now_utc());
    match state.store.count_formations_since(&partner_id, &since).await {
        Ok(used) => Json(billing::summarize(used)).into_response(),
        Err(e) => ServiceError::Store(e).into_response(),
    }
}
