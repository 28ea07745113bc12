use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A company formation filed through a partner. Rows are written by the
/// formation pipeline; the dashboard only reads them.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::formations)]
pub struct Formation {
    pub id: String,
    pub partner_id: String,
    pub company_name: String,
    pub status: String,
    pub created_at: String,
}

/// Verification state of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormationStatus {
    #[default]
    Pending,
    Verified,
    Failed,
}

impl FormationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormationStatus::Pending => "pending",
            FormationStatus::Verified => "verified",
            FormationStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for FormationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FormationStatus::Pending),
            "verified" => Ok(FormationStatus::Verified),
            "failed" => Ok(FormationStatus::Failed),
            _ => Err(format!("unknown formation status: {}", s)),
        }
    }
}

impl std::fmt::Display for FormationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-status formation counts for the dashboard overview.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FormationCounts {
    pub total: i64,
    pub pending: i64,
    pub verified: i64,
}
