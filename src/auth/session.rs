use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_cookies::{Cookie, Cookies};

pub const SESSION_COOKIE: &str = "sid";

/// Payload of the private session cookie minted by the identity layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub partner_id: String,
    pub exp: Option<i64>, // unix seconds
}

/// Read and validate the session cookie. Expired or undecryptable
/// sessions read as absent.
pub fn get_session(cookies: &Cookies, key: &tower_cookies::Key) -> Option<Session> {
    let c = cookies.private(key).get(SESSION_COOKIE)?;
    let session: Session = serde_json::from_str(c.value()).ok()?;
    if let Some(exp) = session.exp {
        if OffsetDateTime::now_utc().unix_timestamp() > exp {
            return None;
        }
    }
    Some(session)
}

pub fn clear_session(cookies: &Cookies, key: &tower_cookies::Key) {
    let mut base = Cookie::new(SESSION_COOKIE, "");
    base.set_path("/");
    cookies.remove(base.clone());
    cookies.private(key).remove(base);
}
