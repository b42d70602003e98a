//! Dashboard statistics service

use crate::{
    api::stats::DashboardResponse,
    error::AppResult,
    models::instance::LoanStatus,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Collect the home-dashboard counts. When a session token is supplied the
    /// per-session visit counter is incremented and echoed back.
    pub async fn dashboard(
        &self,
        title_contains: Option<&str>,
        session_token: Option<&str>,
    ) -> AppResult<DashboardResponse> {
        let num_books = self.repository.books.count(None).await?;
        let num_instances = self.repository.instances.count().await?;
        let num_instances_available = self
            .repository
            .instances
            .count_by_status(LoanStatus::Available)
            .await?;
        let num_authors = self.repository.authors.count().await?;
        let num_genres = self.repository.genres.count().await?;

        let num_books_matching = match title_contains {
            Some(title) => Some(self.repository.books.count(Some(title)).await?),
            None => None,
        };

        let num_visits = match session_token {
            Some(token) => self.repository.sessions.record_visit(token).await?.visit_count,
            None => 0,
        };

        Ok(DashboardResponse {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_genres,
            num_books_matching,
            num_visits,
        })
    }
}
