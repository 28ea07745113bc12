#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use base64::Engine as _;
use rand::RngCore;
use tempfile::TempDir;
use time::OffsetDateTime;
use tower_cookies::Key;

use letsy_partner_api::app::{build_router, AppState};
use letsy_partner_api::auth::session::SESSION_COOKIE;
use letsy_partner_api::config::{decode_cookie_key, AppConfig, DbCfg, ServerCfg};
use letsy_partner_api::db;
use letsy_partner_api::keys::KeyService;
use letsy_partner_api::models::formation::{Formation, FormationStatus};
use letsy_partner_api::models::now_rfc3339;
use letsy_partner_api::models::partner::Partner;
use letsy_partner_api::repos::sqlite::SqlitePartnerStore;
use letsy_partner_api::repos::PartnerStore;

pub struct TestApp {
    pub _dir: TempDir,
    pub router: Router,
    pub store: Arc<dyn PartnerStore>,
    pub keys: KeyService,
    pub cookie_key: Key,
}

/// Build a full app router backed by a temporary SQLite database.
pub async fn test_app() -> TestApp {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("test.sqlite").display().to_string();

    let pool = db::sqlite::make_pool(&db_path).expect("sqlite pool");
    {
        let mut conn = pool.get().expect("db conn");
        db::migrations::run_migrations(&mut conn).expect("migrations");
    }

    let cookie_key_base64 = {
        // 64 random bytes base64
        let mut key = [0u8; 64];
        rand::rngs::OsRng.fill_bytes(&mut key);
        base64::engine::general_purpose::STANDARD.encode(key)
    };
    let config = AppConfig {
        server: ServerCfg {
            bind_addr: "127.0.0.1:0".to_string(),
            cookie_key_base64: cookie_key_base64.clone(),
        },
        db: DbCfg { url: db_path },
    };
    let key_bytes = decode_cookie_key(&cookie_key_base64).expect("cookie key");
    let cookie_key = Key::from(&key_bytes);

    let store: Arc<dyn PartnerStore> = SqlitePartnerStore::new(pool);
    let keys = KeyService::new(store.clone());
    let state = AppState {
        config,
        cookie_key: cookie_key.clone(),
        store: store.clone(),
        keys: keys.clone(),
    };

    TestApp {
        _dir: dir,
        router: build_router(state),
        store,
        keys,
        cookie_key,
    }
}

pub async fn seed_partner(store: &Arc<dyn PartnerStore>, id: &str, company_name: &str) {
    let now = now_rfc3339();
    store
        .insert_partner(Partner {
            id: id.to_string(),
            company_name: company_name.to_string(),
            contact_email: Some(format!("ops@{}.example", id)),
            created_at: now.clone(),
            updated_at: now,
        })
        .await
        .expect("seed partner");
}

pub async fn seed_formation(
    store: &Arc<dyn PartnerStore>,
    partner_id: &str,
    company_name: &str,
    status: FormationStatus,
    created_at: &str,
) {
    store
        .insert_formation(Formation {
            id: uuid::Uuid::new_v4().to_string(),
            partner_id: partner_id.to_string(),
            company_name: company_name.to_string(),
            status: status.as_str().to_string(),
            created_at: created_at.to_string(),
        })
        .await
        .expect("seed formation");
}

/// Mint a Cookie header value carrying a valid private session cookie,
/// the way the identity layer would.
pub fn session_cookie_header(key: &Key, partner_id: &str) -> String {
    let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
    let payload = serde_json::json!({ "partner_id": partner_id, "exp": exp }).to_string();
    let mut jar = tower_cookies::cookie::CookieJar::new();
    jar.private_mut(key)
        .add(tower_cookies::cookie::Cookie::new(SESSION_COOKIE, payload));
    let sealed = jar.get(SESSION_COOKIE).expect("sealed cookie");
    format!("{}={}", SESSION_COOKIE, sealed.value())
}

pub async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json body")
}
