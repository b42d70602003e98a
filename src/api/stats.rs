//! Dashboard statistics endpoint

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

/// Session token header used for the per-session visit counter
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Dashboard query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// Also count books whose title contains this string (case-insensitive)
    pub title_contains: Option<String>,
}

/// Home dashboard counts
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Total number of books
    pub num_books: i64,
    /// Total number of physical copies
    pub num_instances: i64,
    /// Copies currently on the shelf
    pub num_instances_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Total number of genres
    pub num_genres: i64,
    /// Books matching the title filter, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_books_matching: Option<i64>,
    /// Visits recorded for the caller's session token (0 without a token)
    pub num_visits: i32,
}

/// Get the home dashboard counts
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    Query(query): Query<StatsQuery>,
    headers: HeaderMap,
) -> AppResult<Json<DashboardResponse>> {
    let session_token = headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    let stats = state
        .services
        .stats
        .dashboard(query.title_contains.as_deref(), session_token)
        .await?;
    Ok(Json(stats))
}
