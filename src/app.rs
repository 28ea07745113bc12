use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::config::{decode_cookie_key, AppConfig};
use crate::keys::KeyService;
use crate::repos::PartnerStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cookie_key: Key,
    pub store: Arc<dyn PartnerStore>,
    pub keys: KeyService,
}

pub async fn run() -> anyhow::Result<()> {
    // logging
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let config = AppConfig::load()?;
    let key_bytes = decode_cookie_key(&config.server.cookie_key_base64)?;
    let cookie_key = Key::from(&key_bytes);

    // Pool up the database and run migrations eagerly on startup
    let pool = crate::db::sqlite::make_pool(&config.db.url)?;
    {
        let mut conn = pool.get()?;
        crate::db::migrations::run_migrations(&mut conn)?;
    }

    let store: Arc<dyn PartnerStore> = crate::repos::sqlite::SqlitePartnerStore::new(pool);
    let keys = KeyService::new(store.clone());

    let state = AppState {
        config: config.clone(),
        cookie_key,
        store,
        keys,
    };
    let app = build_router(state);

    let addr = config.server.bind_addr.clone();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/me", get(crate::web::handlers::account::me))
        .route("/logout", post(crate::web::handlers::account::logout))
        .route(
            "/api/keys",
            post(crate::web::handlers::keys::create_key).get(crate::web::handlers::keys::list_keys),
        )
        .route(
            "/api/keys/{key_id}/revoke",
            post(crate::web::handlers::keys::revoke_key),
        )
        .route(
            "/api/keys/{key_id}",
            delete(crate::web::handlers::keys::delete_key),
        )
        .route(
            "/api/account",
            get(crate::web::handlers::account::get_account)
                .put(crate::web::handlers::account::update_account)
                .delete(crate::web::handlers::account::delete_account),
        )
        .route(
            "/api/formations",
            get(crate::web::handlers::formations::list_formations),
        )
        .route(
            "/api/overview",
            get(crate::web::handlers::formations::overview),
        )
        .route(
            "/api/billing",
            get(crate::web::handlers::billing::billing_summary),
        )
        .with_state(state)
        .layer(CookieManagerLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
