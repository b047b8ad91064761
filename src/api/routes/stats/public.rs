//! Public types for the stats API
use serde::{Deserialize, Serialize};

/// Stat card numbers for the dashboard
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsTotals {
    pub total_webhooks: i64,
    pub received_today: i64,
    pub failed_today: i64,
}

/// Created/succeeded/failed counts for a single day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: String,
    pub created: i64,
    pub succeeded: i64,
    pub failed: i64,
}

/// Query parameters for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub limit_days: Option<i64>,
}

/// Response combining totals with the daily breakdown
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub totals: StatsTotals,
    pub daily: Vec<DailyActivity>,
}
