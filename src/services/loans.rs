//! Loan workflow service

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{error::AppResult, models::instance::BookInstance, repository::Repository};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check a copy out to a user until the given due date
    pub async fn check_out(
        &self,
        instance_id: Uuid,
        user_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookInstance> {
        // Verify the borrower exists
        self.repository.users.get_by_id(user_id).await?;
        let instance = self
            .repository
            .instances
            .check_out(instance_id, user_id, due_back)
            .await?;
        tracing::info!("Instance {} checked out to user {}", instance_id, user_id);
        Ok(instance)
    }

    /// Return a copy to the shelf
    pub async fn check_in(&self, instance_id: Uuid) -> AppResult<BookInstance> {
        let instance = self.repository.instances.check_in(instance_id).await?;
        tracing::info!("Instance {} returned", instance_id);
        Ok(instance)
    }

    /// List the copies a user currently has out, soonest due first
    pub async fn my_loans(&self, user_id: i32) -> AppResult<Vec<BookInstance>> {
        self.repository.instances.list_on_loan_for_user(user_id).await
    }

    /// List every copy in the library, ordered by status
    pub async fn list_instances(&self) -> AppResult<Vec<BookInstance>> {
        self.repository.instances.list_all().await
    }
}
