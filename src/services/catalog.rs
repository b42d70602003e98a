//! Catalog management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{self, Author, CreateAuthor, UpdateAuthor},
        book::{Book, BookQuery, CreateBook, UpdateBook},
        genre::{CreateGenre, Genre, UpdateGenre},
        instance::{self, BookInstance, CreateBookInstance, UpdateBookInstance},
        language::{CreateLanguage, Language, UpdateLanguage},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // --- Genres ---

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    pub async fn create_genre(&self, data: CreateGenre) -> AppResult<Genre> {
        data.validate()?;
        if self.repository.genres.name_exists(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Genre '{}' already exists",
                data.name
            )));
        }
        self.repository.genres.create(&data).await
    }

    pub async fn update_genre(&self, id: i32, data: UpdateGenre) -> AppResult<Genre> {
        data.validate()?;
        if self.repository.genres.name_exists(&data.name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Genre '{}' already exists",
                data.name
            )));
        }
        self.repository.genres.update(id, &data).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await
    }

    // --- Languages ---

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    pub async fn create_language(&self, data: CreateLanguage) -> AppResult<Language> {
        data.validate()?;
        if self.repository.languages.name_exists(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Language '{}' already exists",
                data.name
            )));
        }
        self.repository.languages.create(&data).await
    }

    pub async fn update_language(&self, id: i32, data: UpdateLanguage) -> AppResult<Language> {
        data.validate()?;
        if self.repository.languages.name_exists(&data.name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Language '{}' already exists",
                data.name
            )));
        }
        self.repository.languages.update(id, &data).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }

    // --- Authors ---

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create_author(&self, data: CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        author::check_lifespan(data.date_of_birth, data.date_of_death)?;
        self.repository.authors.create(&data).await
    }

    pub async fn update_author(&self, id: i32, data: UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        author::check_lifespan(data.date_of_birth, data.date_of_death)?;
        self.repository.authors.update(id, &data).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // --- Books ---

    /// List books with optional title filter
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    /// Get a book together with its physical copies
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        let mut book = self.repository.books.get_by_id(id).await?;
        book.instances = self.repository.instances.list_for_book(id).await?;
        Ok(book)
    }

    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        data.validate()?;
        self.repository.books.create(&data).await
    }

    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        data.validate()?;
        self.repository.books.update(id, &data).await
    }

    /// Delete a book and, through it, every one of its instances
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // --- Instances ---

    pub async fn create_instance(
        &self,
        book_id: i32,
        data: CreateBookInstance,
    ) -> AppResult<BookInstance> {
        data.validate()?;
        instance::check_loan_fields(data.status, data.due_back, data.borrower_id)?;
        // Surface a 404 for the book before the FK does
        self.repository.books.get_by_id(book_id).await?;
        self.repository.instances.create(book_id, &data).await
    }

    pub async fn update_instance(
        &self,
        id: Uuid,
        data: UpdateBookInstance,
    ) -> AppResult<BookInstance> {
        data.validate()?;
        instance::check_loan_fields(data.status, data.due_back, data.borrower_id)?;
        self.repository.instances.update(id, &data).await
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete(id).await
    }
}
