use std::fs;

use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::{async_db, initialize_db};

pub async fn run() -> Result<()> {
    let config = AppConfig::default();

    println!("Initializing db...");
    fs::create_dir_all(&config.storage_path)
        .unwrap_or_else(|err| println!("Ignoring storage directory create failed: {}", err));

    let db = async_db(&config.db_path)
        .await
        .expect("Failed to connect to db");
    db.call(|conn| {
        initialize_db(conn).expect("DB initialization failed");
        Ok(())
    })
    .await?;
    println!("Finished initializing db");

    Ok(())
}
