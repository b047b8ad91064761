//! SQLite connection setup and schema management
use anyhow::Result;
use tokio_rusqlite::Connection;

/// Open the database for async use. Foreign key enforcement is off by
/// default in SQLite and the schema relies on `ON DELETE CASCADE`, so
/// it is enabled on every connection.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    let db = Connection::open(db_path.to_string()).await?;
    db.call(|conn| {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create all tables and indices. Statements are idempotent so this
/// doubles as the migration script.
pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS webhook (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            created_at TEXT NOT NULL,
            success_count INTEGER NOT NULL DEFAULT 0,
            failure_count INTEGER NOT NULL DEFAULT 0,
            last_payload_at TEXT
        );

        CREATE TABLE IF NOT EXISTS webhook_payload (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            webhook_id TEXT NOT NULL REFERENCES webhook(id) ON DELETE CASCADE,
            received_at TEXT NOT NULL,
            body TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS webhook_failure (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            webhook_id TEXT NOT NULL REFERENCES webhook(id) ON DELETE CASCADE,
            received_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS push_subscription (
            endpoint TEXT PRIMARY KEY,
            p256dh TEXT NOT NULL,
            auth TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_webhook_payload_recv
            ON webhook_payload(webhook_id, received_at DESC);
        "#,
    )?;
    Ok(())
}

/// Migrate the db schema to the latest version.
pub fn migrate_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    initialize_db(conn)
}
