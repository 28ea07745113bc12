use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A partner's API key as stored. Only the bcrypt hash of the secret is
/// persisted; the plaintext exists once, in the creation response.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::api_keys)]
pub struct ApiKey {
    pub id: String,
    pub partner_id: String,
    pub name: String,
    pub secret_hash: String,
    pub revoked: bool,
    pub created_at: String,
}

impl ApiKey {
    /// A key authenticates only while it has not been revoked.
    pub fn is_active(&self) -> bool {
        !self.revoked
    }
}
