//! Database queries for the webhooks API
use anyhow::{Error, Result};
use serde_json::Value;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use super::public::{PayloadPage, PayloadRecord, Webhook, WebhookPage};
use crate::core::time::now_rfc3339;

fn row_to_webhook(row: &rusqlite::Row<'_>) -> rusqlite::Result<Webhook> {
    Ok(Webhook {
        id: row.get(0)?,
        url: row.get(1)?,
        created_at: row.get(2)?,
        success_count: row.get(3)?,
        failure_count: row.get(4)?,
        last_payload_at: row.get(5)?,
    })
}

const WEBHOOK_COLUMNS: &str =
    "id, url, created_at, success_count, failure_count, last_payload_at";

/// Create a new webhook with a server generated opaque id.
pub async fn create_webhook(db: &Connection, base_url: &str) -> Result<Webhook, Error> {
    let id = Uuid::new_v4().to_string();
    let url = format!("{}/webhook/{}", base_url.trim_end_matches('/'), id);
    let created_at = now_rfc3339();

    let webhook = Webhook {
        id,
        url,
        created_at,
        success_count: 0,
        failure_count: 0,
        last_payload_at: None,
    };

    let record = webhook.clone();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO webhook (id, url, created_at) VALUES (?, ?, ?)",
            tokio_rusqlite::params![record.id, record.url, record.created_at],
        )?;
        Ok(())
    })
    .await?;

    Ok(webhook)
}

/// Look up a single webhook by id.
pub async fn get_webhook(db: &Connection, id: String) -> Result<Option<Webhook>, Error> {
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM webhook WHERE id = ?",
                WEBHOOK_COLUMNS
            ))?;
            let webhook = stmt
                .query_map([id], row_to_webhook)?
                .filter_map(Result::ok)
                .next();
            Ok(webhook)
        })
        .await?;
    Ok(result)
}

/// Paginated listing of all webhooks, newest first.
pub async fn list_webhooks(db: &Connection, page: i64, per_page: i64) -> Result<WebhookPage, Error> {
    let page = page.max(1);
    let result = db
        .call(move |conn| {
            let total: i64 =
                conn.query_row("SELECT COUNT(id) FROM webhook", [], |row| row.get(0))?;
            let total_pages = (total + per_page - 1) / per_page;
            let offset = (page - 1) * per_page;

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM webhook ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                WEBHOOK_COLUMNS
            ))?;
            let webhooks = stmt
                .query_map([per_page, offset], row_to_webhook)?
                .filter_map(Result::ok)
                .collect::<Vec<Webhook>>();

            Ok(WebhookPage {
                webhooks,
                current_page: page,
                total_pages,
            })
        })
        .await?;
    Ok(result)
}

/// Store a successful delivery and bump the webhook's counters in one
/// transaction. Returns the new payload id and its receipt timestamp.
pub async fn record_payload(
    db: &Connection,
    webhook_id: String,
    body: Value,
) -> Result<(i64, String), Error> {
    let received_at = now_rfc3339();
    let timestamp = received_at.clone();
    let body_text = serde_json::to_string(&body)?;

    let payload_id = db
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO webhook_payload (webhook_id, received_at, body) VALUES (?, ?, ?)",
                tokio_rusqlite::params![webhook_id, received_at, body_text],
            )?;
            let payload_id = tx.last_insert_rowid();
            tx.execute(
                "UPDATE webhook SET success_count = success_count + 1, last_payload_at = ? WHERE id = ?",
                tokio_rusqlite::params![received_at, webhook_id],
            )?;
            tx.commit()?;
            Ok(payload_id)
        })
        .await?;

    Ok((payload_id, timestamp))
}

/// Store a rejected delivery attempt (non-JSON body).
pub async fn record_failure(db: &Connection, webhook_id: String) -> Result<(), Error> {
    let received_at = now_rfc3339();
    db.call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO webhook_failure (webhook_id, received_at) VALUES (?, ?)",
            tokio_rusqlite::params![webhook_id, received_at],
        )?;
        tx.execute(
            "UPDATE webhook SET failure_count = failure_count + 1 WHERE id = ?",
            [webhook_id],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await?;
    Ok(())
}

fn parse_body(raw: String) -> Value {
    // Stored bodies are always valid JSON, but fall back to the raw
    // text rather than dropping the record
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

/// All payloads for a webhook, most recent first.
pub async fn all_payloads(db: &Connection, webhook_id: String) -> Result<Vec<PayloadRecord>, Error> {
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, received_at, body FROM webhook_payload
                 WHERE webhook_id = ?
                 ORDER BY received_at DESC, id DESC",
            )?;
            let payloads = stmt
                .query_map([webhook_id], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
                })?
                .filter_map(Result::ok)
                .collect::<Vec<(i64, String, String)>>();
            Ok(payloads)
        })
        .await?;

    Ok(result
        .into_iter()
        .map(|(id, received_at, raw)| PayloadRecord {
            id,
            received_at,
            body: parse_body(raw),
        })
        .collect())
}

/// One page of payloads for a webhook, most recent first.
pub async fn payloads_page(
    db: &Connection,
    webhook_id: String,
    page: i64,
    per_page: i64,
) -> Result<PayloadPage, Error> {
    let page = page.max(1);
    let (rows, total_pages) = db
        .call(move |conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(id) FROM webhook_payload WHERE webhook_id = ?",
                [&webhook_id],
                |row| row.get(0),
            )?;
            let total_pages = (total + per_page - 1) / per_page;
            let offset = (page - 1) * per_page;

            let mut stmt = conn.prepare(
                "SELECT id, received_at, body FROM webhook_payload
                 WHERE webhook_id = ?
                 ORDER BY received_at DESC, id DESC
                 LIMIT ? OFFSET ?",
            )?;
            let rows = stmt
                .query_map(
                    tokio_rusqlite::params![webhook_id, per_page, offset],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )?
                .filter_map(Result::ok)
                .collect::<Vec<(i64, String, String)>>();
            Ok((rows, total_pages))
        })
        .await?;

    Ok(PayloadPage {
        payloads: rows
            .into_iter()
            .map(|(id, received_at, raw)| PayloadRecord {
                id,
                received_at,
                body: parse_body(raw),
            })
            .collect(),
        current_page: page,
        total_pages,
    })
}

/// A single payload by its id, used for downloads.
pub async fn get_payload(db: &Connection, payload_id: i64) -> Result<Option<PayloadRecord>, Error> {
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, received_at, body FROM webhook_payload WHERE id = ? LIMIT 1",
            )?;
            let row = stmt
                .query_map([payload_id], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .filter_map(Result::ok)
                .next();
            Ok(row)
        })
        .await?;

    Ok(result.map(|(id, received_at, raw)| PayloadRecord {
        id,
        received_at,
        body: parse_body(raw),
    }))
}

/// Delete a webhook; payloads and failures cascade.
pub async fn delete_webhook(db: &Connection, id: String) -> Result<bool, Error> {
    let deleted = db
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM webhook WHERE id = ?", [id])?;
            Ok(deleted)
        })
        .await?;
    Ok(deleted > 0)
}
