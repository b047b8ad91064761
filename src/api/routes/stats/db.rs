//! Database queries for the stats API
use anyhow::{Error, Result};
use tokio_rusqlite::Connection;

use super::public::{DailyActivity, StatsTotals};

/// Stat card totals: webhook count plus deliveries over the last 24h.
pub async fn totals(db: &Connection) -> Result<StatsTotals, Error> {
    let result = db
        .call(|conn| {
            let total_webhooks: i64 =
                conn.query_row("SELECT COUNT(id) FROM webhook", [], |row| row.get(0))?;
            // Threshold rendered in the same RFC 3339 shape as stored
            // timestamps so the string comparison is a time comparison
            let received_today: i64 = conn.query_row(
                "SELECT COUNT(id) FROM webhook_payload
                 WHERE received_at >= strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '-24 hours')",
                [],
                |row| row.get(0),
            )?;
            let failed_today: i64 = conn.query_row(
                "SELECT COUNT(id) FROM webhook_failure
                 WHERE received_at >= strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '-24 hours')",
                [],
                |row| row.get(0),
            )?;
            Ok(StatsTotals {
                total_webhooks,
                received_today,
                failed_today,
            })
        })
        .await?;
    Ok(result)
}

/// Per-day created/succeeded/failed counts for the last N days, oldest
/// first. Days with no activity at all are absent.
pub async fn daily_activity(db: &Connection, limit_days: i64) -> Result<Vec<DailyActivity>, Error> {
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
            SELECT day,
                   SUM(created) AS created,
                   SUM(succeeded) AS succeeded,
                   SUM(failed) AS failed
            FROM (
                SELECT DATE(created_at) AS day, COUNT(id) AS created, 0 AS succeeded, 0 AS failed
                FROM webhook
                WHERE DATE(created_at) >= DATE('now', '-' || ? || ' days')
                GROUP BY day
                UNION ALL
                SELECT DATE(received_at) AS day, 0, COUNT(id), 0
                FROM webhook_payload
                WHERE DATE(received_at) >= DATE('now', '-' || ? || ' days')
                GROUP BY day
                UNION ALL
                SELECT DATE(received_at) AS day, 0, 0, COUNT(id)
                FROM webhook_failure
                WHERE DATE(received_at) >= DATE('now', '-' || ? || ' days')
                GROUP BY day
            )
            GROUP BY day
            ORDER BY day ASC
            "#,
            )?;

            let days = stmt
                .query_map([limit_days, limit_days, limit_days], |row| {
                    Ok(DailyActivity {
                        date: row.get(0)?,
                        created: row.get(1)?,
                        succeeded: row.get(2)?,
                        failed: row.get(3)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<DailyActivity>>();

            Ok(days)
        })
        .await?;
    Ok(result)
}
