//! Books repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        genre::Genre,
    },
};

/// Map foreign-key violations from book writes to a client-facing error
fn map_reference_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some("23503") {
            return AppError::Validation(
                "Unknown author, genre or language reference".to_string(),
            );
        }
    }
    AppError::Database(e)
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books, optionally filtered by case-insensitive title containment
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut books = if let Some(ref title) = query.title {
            sqlx::query_as::<_, Book>(
                "SELECT * FROM books WHERE title ILIKE '%' || $1 || '%'",
            )
            .bind(title)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Book>("SELECT * FROM books")
                .fetch_all(&self.pool)
                .await?
        };

        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let mut genre_map = self.genres_for(&ids).await?;
        for book in &mut books {
            book.genres = genre_map.remove(&book.id).unwrap_or_default();
        }
        Ok(books)
    }

    /// Count books, optionally filtered by case-insensitive title containment
    pub async fn count(&self, title_contains: Option<&str>) -> AppResult<i64> {
        let count: i64 = if let Some(title) = title_contains {
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title ILIKE '%' || $1 || '%'")
                .bind(title)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT COUNT(*) FROM books")
                .fetch_one(&self.pool)
                .await?
        };
        Ok(count)
    }

    /// Get book by ID with its genres
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let mut genre_map = self.genres_for(&[id]).await?;
        book.genres = genre_map.remove(&id).unwrap_or_default();
        Ok(book)
    }

    /// Create a new book together with its genre links
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_reference_error)?;

        let id: i32 = row.get("id");

        for genre_id in &data.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await
                .map_err(map_reference_error)?;
        }

        tx.commit().await?;
        self.get_by_id(id).await
    }

    /// Update a book (full-record replace, including its genre set)
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4, language_id = $5
            WHERE id = $6
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_reference_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for genre_id in &data.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await
                .map_err(map_reference_error)?;
        }

        tx.commit().await?;
        self.get_by_id(id).await
    }

    /// Delete a book. Its instances go with it (FK cascade).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Fetch genres for a set of books, keyed by book id
    async fn genres_for(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Genre>>> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT bg.book_id, g.id, g.name
            FROM book_genres bg
            JOIN genres g ON bg.genre_id = g.id
            WHERE bg.book_id = ANY($1)
            ORDER BY g.name
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i32, Vec<Genre>> = HashMap::new();
        for row in rows {
            let book_id: i32 = row.get("book_id");
            map.entry(book_id).or_default().push(Genre {
                id: row.get("id"),
                name: row.get("name"),
            });
        }
        Ok(map)
    }
}
