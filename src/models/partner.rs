use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A partner account. The id is the principal id established by the
/// identity layer; email stays read-only here.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::partners)]
pub struct Partner {
    pub id: String,
    pub company_name: String,
    pub contact_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
