use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub base_url: String,
    pub admin_user: String,
    pub admin_password: String,
    pub payloads_per_page: i64,
    pub vapid_key_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = "127.0.0.1";
        let port = "2222";
        let storage_path = env::var("HOOKBIN_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/hookbin.db", storage_path.trim_end_matches('/'));
        let base_url =
            env::var("HOOKBIN_BASE_URL").unwrap_or(format!("http://{}:{}", host, port));
        let admin_user = env::var("HOOKBIN_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            env::var("HOOKBIN_ADMIN_PASSWORD").unwrap_or_else(|_| "supersecret".to_string());
        let payloads_per_page = env::var("HOOKBIN_PER_PAGE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(20);
        // Web Push is disabled when no VAPID signing key is configured
        let vapid_key_path = env::var("HOOKBIN_VAPID_KEY_PATH").ok();

        Self {
            storage_path,
            db_path,
            base_url,
            admin_user,
            admin_password,
            payloads_per_page,
            vapid_key_path,
        }
    }
}
