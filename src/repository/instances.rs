//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::instance::{
        BookInstance, BookInstanceRow, CreateBookInstance, LoanStatus, UpdateBookInstance,
    },
};

/// Map foreign-key violations from instance writes to a client-facing error
fn map_reference_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some("23503") {
            return AppError::Validation("Unknown book or borrower reference".to_string());
        }
    }
    AppError::Database(e)
}

/// Shared SELECT joining each copy with its book title and language name
const SELECT_INSTANCE: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, bi.borrower_id,
           b.title AS book_title, l.name AS language
    FROM book_instances bi
    JOIN books b ON bi.book_id = b.id
    LEFT JOIN languages l ON b.language_id = l.id
"#;

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstanceRow>(
            &format!("{} WHERE bi.id = $1", SELECT_INSTANCE),
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;
        Ok(row.into())
    }

    /// List all instances, ordered by status
    pub async fn list_all(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(
            &format!("{} ORDER BY bi.status, bi.id", SELECT_INSTANCE),
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the instances of a single book
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(
            &format!("{} WHERE bi.book_id = $1 ORDER BY bi.id", SELECT_INSTANCE),
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the copies a user currently has out, soonest due first
    pub async fn list_on_loan_for_user(&self, user_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(
            &format!(
                "{} WHERE bi.borrower_id = $1 AND bi.status = 'o' ORDER BY bi.due_back",
                SELECT_INSTANCE
            ),
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count all instances
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count instances with an exact status
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status.as_code())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Create a new instance for a book
    pub async fn create(&self, book_id: i32, data: &CreateBookInstance) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(book_id)
        .bind(&data.imprint)
        .bind(data.status.as_code())
        .bind(data.due_back)
        .bind(data.borrower_id)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        self.get_by_id(id).await
    }

    /// Update an instance (full-record replace)
    pub async fn update(&self, id: Uuid, data: &UpdateBookInstance) -> AppResult<BookInstance> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET imprint = $1, status = $2, due_back = $3, borrower_id = $4
            WHERE id = $5
            "#,
        )
        .bind(&data.imprint)
        .bind(data.status.as_code())
        .bind(data.due_back)
        .bind(data.borrower_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Delete an instance
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Check a copy out to a borrower.
    /// The UPDATE is guarded on the current status so a concurrent check-out
    /// loses the race at the storage layer instead of double-borrowing.
    pub async fn check_out(
        &self,
        id: Uuid,
        user_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookInstance> {
        let current = self.get_by_id(id).await?;
        if !current.status.can_check_out() {
            return Err(AppError::InvalidTransition(format!(
                "Book instance {} cannot be checked out while '{}'",
                id,
                current.status.as_code()
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET status = 'o', borrower_id = $2, due_back = $3
            WHERE id = $1 AND status = 'a'
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(due_back)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvalidTransition(format!(
                "Book instance {} was checked out concurrently",
                id
            )));
        }
        self.get_by_id(id).await
    }

    /// Return a copy to the shelf, clearing borrower and due date
    pub async fn check_in(&self, id: Uuid) -> AppResult<BookInstance> {
        let current = self.get_by_id(id).await?;
        if !current.status.can_check_in() {
            return Err(AppError::InvalidTransition(format!(
                "Book instance {} is not on loan",
                id
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET status = 'a', borrower_id = NULL, due_back = NULL
            WHERE id = $1 AND status = 'o'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvalidTransition(format!(
                "Book instance {} was returned concurrently",
                id
            )));
        }
        self.get_by_id(id).await
    }
}
