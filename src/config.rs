use base64::Engine as _;
use rand::RngCore;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerCfg {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Base64-encoded 32- or 64-byte key used to sign/encrypt cookies
    pub cookie_key_base64: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbCfg {
    /// Path or URL of the SQLite database, e.g. letsy.db
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerCfg,
    pub db: DbCfg,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl AppConfig {
    /// Load configuration from the environment (and .env when present).
    ///
    /// Nested keys use double underscores (SERVER__BIND_ADDR); the flat
    /// APP_BIND_ADDR, COOKIE_KEY_BASE64 and DATABASE_URL names are accepted
    /// as fallbacks.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        let mut server = settings.get::<ServerCfg>("server").unwrap_or(ServerCfg {
            bind_addr: std::env::var("APP_BIND_ADDR").unwrap_or_else(|_| default_bind_addr()),
            cookie_key_base64: std::env::var("COOKIE_KEY_BASE64").unwrap_or_default(),
        });
        if server.cookie_key_base64.is_empty() {
            if let Ok(v) = std::env::var("COOKIE_KEY_BASE64") {
                server.cookie_key_base64 = v;
            } else {
                // Generate a dev key (64 bytes) and keep it in-memory only
                let mut key = [0u8; 64];
                rand::rngs::OsRng.fill_bytes(&mut key);
                server.cookie_key_base64 = base64::engine::general_purpose::STANDARD.encode(key);
                tracing::warn!(
                    "COOKIE_KEY_BASE64 not provided; generated a temporary dev key. Sessions will be invalidated on restart."
                );
            }
        }

        let db = match settings.get::<DbCfg>("db") {
            Ok(db) => db,
            Err(_) => DbCfg {
                url: std::env::var("DATABASE_URL")?,
            },
        };

        Ok(AppConfig { server, db })
    }
}

pub fn decode_cookie_key(b64: &str) -> anyhow::Result<[u8; 64]> {
    // tower-cookies expects a 64-byte key for Private (32 signing + 32 encryption)
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.as_bytes())
        .map_err(|e| anyhow::anyhow!("invalid COOKIE_KEY_BASE64: {}", e))?;
    if bytes.len() == 32 {
        // A 32-byte key is duplicated to fill both halves
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&bytes);
        out[32..].copy_from_slice(&bytes);
        return Ok(out);
    }
    if bytes.len() != 64 {
        return Err(anyhow::anyhow!(
            "COOKIE_KEY_BASE64 must decode to 32 or 64 bytes, got {}",
            bytes.len()
        ));
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&bytes);
    Ok(out)
}
