mod versions;

pub use versions::*;

use super::error::{DbError, DbResult};

/// Convert a `COUNT(*)` result into a row count.
pub(crate) fn row_count(value: i64) -> DbResult<u64> {
    u64::try_from(value).map_err(|_| DbError::Internal(format!("Negative row count: {value}")))
}
