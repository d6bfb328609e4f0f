//! Book management service

use std::collections::HashMap;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookWithAuthor, CreateBook, UpdateBook},
        validation_message,
    },
    query::{build_pagination, ListQuery, Page},
    repository::{books::BOOK_FIELDS, Repository},
    services::parse_id,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with filtering, sorting, selection and pagination;
    /// the author reference is always expanded
    pub async fn list(&self, params: &HashMap<String, String>) -> AppResult<Page> {
        let query = ListQuery::from_params(params, &BOOK_FIELDS)?;
        let (books, total) = self.repository.books.list(&query).await?;

        let items = books
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to serialize books: {}", e)))?;

        Ok(Page {
            items: query.apply_select(items),
            pagination: build_pagination(query.page, query.limit, total),
        })
    }

    pub async fn get(&self, raw_id: &str) -> AppResult<BookWithAuthor> {
        let id = parse_id(raw_id, "book")?;
        self.repository
            .books
            .find_with_author(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", raw_id)))
    }

    /// Create a book. Check order is part of the contract: the author
    /// must exist before the ISBN is checked, so the author error wins
    /// when both violations coexist.
    ///
    /// The author check and the insert are separate statements with no
    /// transaction; a concurrent author delete can leave the new book
    /// referencing a missing author. Documented gap, matching the
    /// store's lack of a foreign key.
    pub async fn create(&self, payload: CreateBook) -> AppResult<BookWithAuthor> {
        self.ensure_author_exists(payload.author).await?;

        if self.repository.books.isbn_exists(&payload.isbn, None).await? {
            return Err(AppError::DuplicateIsbn(
                "Book with this ISBN already exists".to_string(),
            ));
        }

        payload
            .validate()
            .map_err(|e| AppError::Validation(validation_message(&e)))?;

        if payload.title.trim().is_empty() {
            return Err(AppError::Validation("Please add a book title".to_string()));
        }
        if payload.isbn.is_empty() {
            return Err(AppError::Validation("Please add an ISBN".to_string()));
        }

        let id = self.repository.books.create(&payload).await?;
        self.repository
            .books
            .find_with_author(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Created book {} not found", id)))
    }

    /// Partial update. The author reference is re-validated only when it
    /// changes; the ISBN only when it changes to a different value
    /// (updating a book to its own current ISBN succeeds).
    pub async fn update(&self, raw_id: &str, payload: UpdateBook) -> AppResult<BookWithAuthor> {
        let id = parse_id(raw_id, "book")?;

        let current = self
            .repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", raw_id)))?;

        payload
            .validate()
            .map_err(|e| AppError::Validation(validation_message(&e)))?;

        if let Some(ref title) = payload.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Please add a book title".to_string()));
            }
        }

        if let Some(author_id) = payload.author {
            if author_id != current.author_id {
                self.ensure_author_exists(author_id).await?;
            }
        }

        if let Some(ref isbn) = payload.isbn {
            if isbn.is_empty() {
                return Err(AppError::Validation("Please add an ISBN".to_string()));
            }
            if *isbn != current.isbn
                && self.repository.books.isbn_exists(isbn, Some(id)).await?
            {
                return Err(AppError::DuplicateIsbn(
                    "Book with this ISBN already exists".to_string(),
                ));
            }
        }

        self.repository.books.update(id, &payload).await?;
        self.repository
            .books
            .find_with_author(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", raw_id)))
    }

    /// Unconditional delete; books have no dependents
    pub async fn delete(&self, raw_id: &str) -> AppResult<()> {
        let id = parse_id(raw_id, "book")?;
        if !self.repository.books.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Book not found with id: {}",
                raw_id
            )));
        }
        Ok(())
    }

    async fn ensure_author_exists(&self, author_id: Uuid) -> AppResult<()> {
        self.repository
            .authors
            .find_by_id(author_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Author not found with id: {}", author_id)))
    }
}
