use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use std::future::Future;
use tower_cookies::Cookies;

use crate::app::AppState;
use crate::auth::session;
use crate::error::ServiceError;
use crate::keys::secret::SECRET_PREFIX;

/// Extractor that requires an authenticated partner.
///
/// Two ways in: a `letsy_` key secret as a bearer token, or the private
/// session cookie minted by the identity layer.
///
/// Usage:
/// ```
/// use letsy_partner_api::web::session::SessionPartner;
/// use axum::response::IntoResponse;
///
/// async fn handler(SessionPartner { partner_id }: SessionPartner) -> impl IntoResponse {
///     format!("Partner: {}", partner_id)
/// }
/// ```
pub struct SessionPartner {
    pub partner_id: String,
}

impl FromRequestParts<AppState> for SessionPartner {
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // A bearer key secret wins over any cookie; a bad one does not
            // fall back to the cookie.
            if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Some(token) = auth_str.strip_prefix("Bearer ") {
                        if token.starts_with(SECRET_PREFIX) {
                            let auth = state
                                .keys
                                .authenticate(token)
                                .await
                                .map_err(|e| e.into_response())?;
                            return Ok(SessionPartner {
                                partner_id: auth.partner_id,
                            });
                        }
                    }
                }
            }

            let cookies = Cookies::from_request_parts(parts, state).await.map_err(|e| {
                tracing::error!(error = ?e, "failed to extract cookies");
                ServiceError::Unauthenticated.into_response()
            })?;

            match session::get_session(&cookies, &state.cookie_key) {
                Some(s) => Ok(SessionPartner {
                    partner_id: s.partner_id,
                }),
                None => Err(ServiceError::Unauthenticated.into_response()),
            }
        }
    }
}
