//! Named leases with expiry. A lease is free when absent or expired.

use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use surveyor_core::errors::SurveyorResult;

use super::fmt_dt;
use crate::to_storage_err;

/// Take `name` for `holder` until now + `ttl`. Succeeds when the lease is
/// free, expired, or already held by `holder` (which renews it).
pub fn try_acquire_lease(
    conn: &Connection,
    name: &str,
    holder: &str,
    ttl: Duration,
) -> SurveyorResult<bool> {
    let now = Utc::now();
    let changed = conn
        .execute(
            "INSERT INTO retraining_leases (name, holder, acquired_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                holder = excluded.holder,
                acquired_at = excluded.acquired_at,
                expires_at = excluded.expires_at
             WHERE retraining_leases.holder = excluded.holder
                OR retraining_leases.expires_at <= excluded.acquired_at",
            params![name, holder, fmt_dt(&now), fmt_dt(&(now + ttl))],
        )
        .map_err(|e| to_storage_err(format!("acquire lease {name}: {e}")))?;
    Ok(changed > 0)
}

/// Drop the lease if `holder` owns it. Releasing someone else's lease is a no-op.
pub fn release_lease(conn: &Connection, name: &str, holder: &str) -> SurveyorResult<()> {
    conn.execute(
        "DELETE FROM retraining_leases WHERE name = ?1 AND holder = ?2",
        params![name, holder],
    )
    .map_err(|e| to_storage_err(format!("release lease {name}: {e}")))?;
    Ok(())
}

/// The unexpired holder of `name`, if any.
pub fn lease_holder(conn: &Connection, name: &str) -> SurveyorResult<Option<String>> {
    conn.query_row(
        "SELECT holder FROM retraining_leases WHERE name = ?1 AND expires_at > ?2",
        params![name, fmt_dt(&Utc::now())],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
