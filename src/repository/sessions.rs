//! Dashboard sessions repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::session::SessionVisit};

#[derive(Clone)]
pub struct SessionsRepository {
    pool: Pool<Postgres>,
}

impl SessionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record one dashboard visit for a session token and return the updated
    /// row. Unseen tokens start counting at 1.
    pub async fn record_visit(&self, token: &str) -> AppResult<SessionVisit> {
        let visit = sqlx::query_as::<_, SessionVisit>(
            r#"
            INSERT INTO sessions (token, visit_count)
            VALUES ($1, 1)
            ON CONFLICT (token)
            DO UPDATE SET visit_count = sessions.visit_count + 1, last_seen = NOW()
            RETURNING *
            "#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(visit)
    }
}
