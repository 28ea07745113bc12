pub mod api_key;
pub mod formation;
pub mod partner;

use time::macros::format_description;
use time::OffsetDateTime;

/// Current UTC time in RFC 3339, the format every timestamp column stores.
/// The fraction is always nine digits; stamps of equal length sort in time
/// order as plain text.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
        ))
        .expect("UTC now formats as RFC 3339")
}
