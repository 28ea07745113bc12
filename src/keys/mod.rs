pub mod secret;

use std::sync::Arc;

use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::models::api_key::ApiKey;
use crate::models::now_rfc3339;
use crate::repos::PartnerStore;

/// Outcome of issuing a key: the stored record plus the plaintext secret.
/// The secret lives only in this value and the creation response.
#[derive(Debug)]
pub struct IssuedKey {
    pub record: ApiKey,
    pub secret: String,
}

/// Identity established by a presented bearer secret.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedKey {
    pub key_id: String,
    pub partner_id: String,
}

/// API key issuance, lifecycle and verification on top of the store.
#[derive(Clone)]
pub struct KeyService {
    store: Arc<dyn PartnerStore>,
}

impl KeyService {
    pub fn new(store: Arc<dyn PartnerStore>) -> Self {
        Self { store }
    }

    /// Issue a new key for the partner. The secret is returned exactly once;
    /// only its bcrypt hash is stored.
    pub async fn generate(&self, partner_id: &str, name: &str) -> ServiceResult<IssuedKey> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("name must not be empty".into()));
        }

        let plaintext = secret::generate_secret();
        let secret_hash = {
            let plaintext = plaintext.clone();
            tokio::task::spawn_blocking(move || secret::hash_secret(&plaintext))
                .await
                .map_err(anyhow::Error::from)??
        };

        let record = ApiKey {
            id: uuid::Uuid::new_v4().to_string(),
            partner_id: partner_id.to_string(),
            name: name.to_string(),
            secret_hash,
            revoked: false,
            created_at: now_rfc3339(),
        };
        self.store.insert_api_key(record.clone()).await?;
        tracing::info!(partner_id = %record.partner_id, key_id = %record.id, "issued api key");
        Ok(IssuedKey {
            record,
            secret: plaintext,
        })
    }

    /// All of the partner's keys, newest first.
    pub async fn list(&self, partner_id: &str) -> ServiceResult<Vec<ApiKey>> {
        Ok(self.store.list_api_keys(partner_id).await?)
    }

    /// Mark a key revoked. Revoking an already revoked key is a no-op;
    /// there is no way back to active.
    pub async fn revoke(&self, partner_id: &str, key_id: &str) -> ServiceResult<()> {
        let Some(key) = self.store.get_api_key(partner_id, key_id).await? else {
            return Err(ServiceError::NotFound);
        };
        if key.revoked {
            return Ok(());
        }
        self.store.set_api_key_revoked(partner_id, key_id).await?;
        tracing::info!(partner_id = %partner_id, key_id = %key_id, "revoked api key");
        Ok(())
    }

    /// Hard-delete a key. Only revoked keys may be deleted.
    pub async fn delete(&self, partner_id: &str, key_id: &str) -> ServiceResult<()> {
        let Some(key) = self.store.get_api_key(partner_id, key_id).await? else {
            return Err(ServiceError::NotFound);
        };
        if key.is_active() {
            return Err(ServiceError::PreconditionFailed(
                "key must be revoked before deletion".into(),
            ));
        }
        self.store.delete_api_key(partner_id, key_id).await?;
        tracing::info!(partner_id = %partner_id, key_id = %key_id, "deleted api key");
        Ok(())
    }

    /// Resolve a presented bearer secret to the key it belongs to.
    ///
    /// bcrypt salts every hash, so there is nothing to look up by value: each
    /// non-revoked key's hash is verified against the secret until one
    /// matches. Revoked keys are never candidates.
    pub async fn authenticate(&self, presented: &str) -> ServiceResult<AuthenticatedKey> {
        if !presented.starts_with(secret::SECRET_PREFIX) {
            return Err(ServiceError::Unauthenticated);
        }
        let candidates = self.store.list_active_api_keys().await?;
        let presented = presented.to_string();
        let matched = tokio::task::spawn_blocking(move || {
            candidates
                .into_iter()
                .find(|key| secret::verify_secret(&presented, &key.secret_hash))
        })
        .await
        .map_err(anyhow::Error::from)?;

        match matched {
            Some(key) => Ok(AuthenticatedKey {
                key_id: key.id,
                partner_id: key.partner_id,
            }),
            None => Err(ServiceError::Unauthenticated),
        }
    }
}
