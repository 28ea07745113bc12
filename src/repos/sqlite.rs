use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::OptionalExtension;

use crate::models::{
    api_key::ApiKey,
    formation::{Formation, FormationCounts, FormationStatus},
    partner::Partner,
};
use crate::repos::PartnerStore;
use crate::schema::{api_keys, formations, partners};

pub struct SqlitePartnerStore {
    pool: crate::db::sqlite::SqlitePool,
}

impl SqlitePartnerStore {
    pub fn new(pool: crate::db::sqlite::SqlitePool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl PartnerStore for SqlitePartnerStore {
    async fn get_partner(&self, partner_id: &str) -> anyhow::Result<Option<Partner>> {
        let partner_id = partner_id.to_string();
        let pool = self.pool.clone();
        let partner = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<Partner>> {
            let mut conn = pool.get()?;
            let row = partners::table
                .find(&partner_id)
                .first::<Partner>(&mut conn)
                .optional()?;
            Ok(row)
        })
        .await??;
        Ok(partner)
    }

    async fn insert_partner(&self, partner: Partner) -> anyhow::Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut conn = pool.get()?;
            diesel::insert_into(partners::table)
                .values(&partner)
                .execute(&mut conn)?;
            Ok(())
        })
        .await??;
        Ok(())
    }

    async fn update_partner_company_name(
        &self,
        partner_id: &str,
        company_name: &str,
    ) -> anyhow::Result<usize> {
        let partner_id = partner_id.to_string();
        let company_name = company_name.to_string();
        let pool = self.pool.clone();
        let now = crate::models::now_rfc3339();
        let n = tokio::task::spawn_blocking(move || -> anyhow::Result<usize> {
            let mut conn = pool.get()?;
            let n = diesel::update(partners::table.find(&partner_id))
                .set((
                    partners::company_name.eq(&company_name),
                    partners::updated_at.eq(&now),
                ))
                .execute(&mut conn)?;
            Ok(n)
        })
        .await??;
        Ok(n)
    }

    async fn delete_partner_account(&self, partner_id: &str) -> anyhow::Result<()> {
        let partner_id = partner_id.to_string();
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut conn = pool.get()?;
            conn.immediate_transaction(|conn| {
                diesel::delete(api_keys::table.filter(api_keys::partner_id.eq(&partner_id)))
                    .execute(conn)?;
                diesel::delete(formations::table.filter(formations::partner_id.eq(&partner_id)))
                    .execute(conn)?;
                diesel::delete(partners::table.find(&partner_id)).execute(conn)?;
                Ok(())
            })
        })
        .await??;
        Ok(())
    }

    async fn insert_api_key(&self, api_key: ApiKey) -> anyhow::Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut conn = pool.get()?;
            diesel::insert_into(api_keys::table)
                .values(&api_key)
                .execute(&mut conn)?;
            Ok(())
        })
        .await??;
        Ok(())
    }

    async fn list_api_keys(&self, partner_id: &str) -> anyhow::Result<Vec<ApiKey>> {
        let partner_id = partner_id.to_string();
        let pool = self.pool.clone();
        let keys = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<ApiKey>> {
            let mut conn = pool.get()?;
            let rows = api_keys::table
                .filter(api_keys::partner_id.eq(&partner_id))
                .order(api_keys::created_at.desc())
                .load::<ApiKey>(&mut conn)?;
            Ok(rows)
        })
        .await??;
        Ok(keys)
    }

    async fn get_api_key(&self, partner_id: &str, key_id: &str) -> anyhow::Result<Option<ApiKey>> {
        let partner_id = partner_id.to_string();
        let key_id = key_id.to_string();
        let pool = self.pool.clone();
        let key = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<ApiKey>> {
            let mut conn = pool.get()?;
            let row = api_keys::table
                .filter(api_keys::id.eq(&key_id))
                .filter(api_keys::partner_id.eq(&partner_id))
                .first::<ApiKey>(&mut conn)
                .optional()?;
            Ok(row)
        })
        .await??;
        Ok(key)
    }

    async fn set_api_key_revoked(&self, partner_id: &str, key_id: &str) -> anyhow::Result<usize> {
        let partner_id = partner_id.to_string();
        let key_id = key_id.to_string();
        let pool = self.pool.clone();
        let n = tokio::task::spawn_blocking(move || -> anyhow::Result<usize> {
            let mut conn = pool.get()?;
            let n = diesel::update(
                api_keys::table
                    .filter(api_keys::id.eq(&key_id))
                    .filter(api_keys::partner_id.eq(&partner_id)),
            )
            .set(api_keys::revoked.eq(true))
            .execute(&mut conn)?;
            Ok(n)
        })
        .await??;
        Ok(n)
    }

    async fn delete_api_key(&self, partner_id: &str, key_id: &str) -> anyhow::Result<usize> {
        let partner_id = partner_id.to_string();
        let key_id = key_id.to_string();
        let pool = self.pool.clone();
        let n = tokio::task::spawn_blocking(move || -> anyhow::Result<usize> {
            let mut conn = pool.get()?;
            let n = diesel::delete(
                api_keys::table
                    .filter(api_keys::id.eq(&key_id))
                    .filter(api_keys::partner_id.eq(&partner_id)),
            )
            .execute(&mut conn)?;
            Ok(n)
        })
        .await??;
        Ok(n)
    }

    async fn list_active_api_keys(&self) -> anyhow::Result<Vec<ApiKey>> {
        let pool = self.pool.clone();
        let keys = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<ApiKey>> {
            let mut conn = pool.get()?;
            let rows = api_keys::table
                .filter(api_keys::revoked.eq(false))
                .load::<ApiKey>(&mut conn)?;
            Ok(rows)
        })
        .await??;
        Ok(keys)
    }

    async fn count_active_api_keys(&self, partner_id: &str) -> anyhow::Result<i64> {
        let partner_id = partner_id.to_string();
        let pool = self.pool.clone();
        let n = tokio::task::spawn_blocking(move || -> anyhow::Result<i64> {
            let mut conn = pool.get()?;
            use diesel::dsl::count_star;
            let n: i64 = api_keys::table
                .filter(api_keys::partner_id.eq(&partner_id))
                .filter(api_keys::revoked.eq(false))
                .select(count_star())
                .first(&mut conn)?;
            Ok(n)
        })
        .await??;
        Ok(n)
    }

    async fn insert_formation(&self, formation: Formation) -> anyhow::Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut conn = pool.get()?;
            diesel::insert_into(formations::table)
                .values(&formation)
                .execute(&mut conn)?;
            Ok(())
        })
        .await??;
        Ok(())
    }

    async fn list_formations(
        &self,
        partner_id: &str,
        status: Option<&str>,
    ) -> anyhow::Result<Vec<Formation>> {
        let partner_id = partner_id.to_string();
        let status = status.map(|s| s.to_string());
        let pool = self.pool.clone();
        let rows = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<Formation>> {
            let mut conn = pool.get()?;
            let mut query = formations::table
                .filter(formations::partner_id.eq(&partner_id))
                .into_boxed();
            if let Some(status) = status {
                query = query.filter(formations::status.eq(status));
            }
            let rows = query
                .order(formations::created_at.desc())
                .load::<Formation>(&mut conn)?;
            Ok(rows)
        })
        .await??;
        Ok(rows)
    }

    async fn count_formations(&self, partner_id: &str) -> anyhow::Result<FormationCounts> {
        let partner_id = partner_id.to_string();
        let pool = self.pool.clone();
        let counts = tokio::task::spawn_blocking(move || -> anyhow::Result<FormationCounts> {
            let mut conn = pool.get()?;
            use diesel::dsl::count_star;
            let total: i64 = formations::table
                .filter(formations::partner_id.eq(&partner_id))
                .select(count_star())
                .first(&mut conn)?;
            let pending: i64 = formations::table
                .filter(formations::partner_id.eq(&partner_id))
                .filter(formations::status.eq(FormationStatus::Pending.as_str()))
                .select(count_star())
                .first(&mut conn)?;
            let verified: i64 = formations::table
                .filter(formations::partner_id.eq(&partner_id))
                .filter(formations::status.eq(FormationStatus::Verified.as_str()))
                .select(count_star())
                .first(&mut conn)?;
            Ok(FormationCounts {
                total,
                pending,
                verified,
            })
        })
        .await??;
        Ok(counts)
    }

    async fn count_formations_since(&self, partner_id: &str, since: &str) -> anyhow::Result<i64> {
        let partner_id = partner_id.to_string();
        let since = since.to_string();
        let pool = self.pool.clone();
        let n = tokio::task::spawn_blocking(move || -> anyhow::Result<i64> {
            let mut conn = pool.get()?;
            use diesel::dsl::count_star;
            let n: i64 = formations::table
                .filter(formations::partner_id.eq(&partner_id))
                .filter(formations::created_at.ge(&since))
                .select(count_star())
                .first(&mut conn)?;
            Ok(n)
        })
        .await??;
        Ok(n)
    }
}
