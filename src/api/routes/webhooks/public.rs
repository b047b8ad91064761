//! Public types for the webhooks API
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A generated webhook endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub created_at: String,
    pub success_count: i64,
    pub failure_count: i64,
    pub last_payload_at: Option<String>,
}

/// A single stored payload
#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadRecord {
    pub id: i64,
    pub received_at: String,
    pub body: Value,
}

/// Acknowledgement returned to the sender on a successful delivery
#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiveAck {
    pub status: String,
    pub timestamp: String,
}

/// One page of webhooks, newest first
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookPage {
    pub webhooks: Vec<Webhook>,
    pub current_page: i64,
    pub total_pages: i64,
}

/// One page of payloads for a single webhook, most recent first
#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadPage {
    pub payloads: Vec<PayloadRecord>,
    pub current_page: i64,
    pub total_pages: i64,
}

/// Query parameters for paginated listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}
