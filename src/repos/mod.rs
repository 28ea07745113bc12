use async_trait::async_trait;

use crate::models::{
    api_key::ApiKey,
    formation::{Formation, FormationCounts},
    partner::Partner,
};

/// Row-level store behind the dashboard. Every partner-scoped read and
/// write carries the owner id into the query itself.
#[async_trait]
pub trait PartnerStore: Send + Sync {
    // Partner operations
    async fn get_partner(&self, partner_id: &str) -> anyhow::Result<Option<Partner>>;
    async fn insert_partner(&self, partner: Partner) -> anyhow::Result<()>;
    async fn update_partner_company_name(
        &self,
        partner_id: &str,
        company_name: &str,
    ) -> anyhow::Result<usize>;
    async fn delete_partner_account(&self, partner_id: &str) -> anyhow::Result<()>;

    // API key operations
    async fn insert_api_key(&self, api_key: ApiKey) -> anyhow::Result<()>;
    async fn list_api_keys(&self, partner_id: &str) -> anyhow::Result<Vec<ApiKey>>;
    async fn get_api_key(&self, partner_id: &str, key_id: &str) -> anyhow::Result<Option<ApiKey>>;
    async fn set_api_key_revoked(&self, partner_id: &str, key_id: &str) -> anyhow::Result<usize>;
    async fn delete_api_key(&self, partner_id: &str, key_id: &str) -> anyhow::Result<usize>;
    async fn list_active_api_keys(&self) -> anyhow::Result<Vec<ApiKey>>;
    async fn count_active_api_keys(&self, partner_id: &str) -> anyhow::Result<i64>;

    // Formation operations
    async fn insert_formation(&self, formation: Formation) -> anyhow::Result<()>;
    async fn list_formations(
        &self,
        partner_id: &str,
        status: Option<&str>,
    ) -> anyhow::Result<Vec<Formation>>;
    async fn count_formations(&self, partner_id: &str) -> anyhow::Result<FormationCounts>;
    async fn count_formations_since(&self, partner_id: &str, since: &str) -> anyhow::Result<i64>;
}

pub mod sqlite;
