use handlebars::Handlebars;
use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::dashboard;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Compiled dashboard templates, registered once at startup
    pub templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self {
            db,
            config,
            templates: dashboard::engine(),
        }
    }
}
