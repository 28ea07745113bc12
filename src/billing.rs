use serde::Serialize;
use time::OffsetDateTime;

/// The only plan currently offered.
pub const FREE_PLAN_NAME: &str = "Free";
/// Formations included each calendar month on the free plan.
pub const FREE_PLAN_MONTHLY_ALLOWANCE: i64 = 1_000;
/// Price per formation beyond the allowance, in cents.
pub const OVERAGE_CENTS: i64 = 49;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    pub plan: &'static str,
    pub monthly_allowance: i64,
    pub used: i64,
    pub remaining: i64,
    pub amount_due_cents: i64,
}

/// Summarize a month's usage against the plan allowance.
pub fn summarize(used: i64) -> BillingSummary {
    let remaining = (FREE_PLAN_MONTHLY_ALLOWANCE - used).max(0);
    let overage = (used - FREE_PLAN_MONTHLY_ALLOWANCE).max(0);
    BillingSummary {
        plan: FREE_PLAN_NAME,
        monthly_allowance: FREE_PLAN_MONTHLY_ALLOWANCE,
        used,
        remaining,
        amount_due_cents: overage * OVERAGE_CENTS,
    }
}

/// First instant of the month containing `now`, as a lower bound for string
/// comparison against stored timestamps. No offset suffix: `.` sorts below
/// `Z`, so a `Z`-terminated bound would sit above stamps with fractional
/// seconds in the month's first second.
pub fn month_start_rfc3339(now: OffsetDateTime) -> String {
    format!("{:04}-{:02}-01T00:00:00", now.year(), u8::from(now.month()))
}
