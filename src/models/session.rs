//! Dashboard session model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Per-session visit counter row
#[derive(Debug, Clone, FromRow)]
pub struct SessionVisit {
    pub token: String,
    pub visit_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}
