//! Author management service

use std::collections::HashMap;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorSummary, CreateAuthor, UpdateAuthor},
        book::Book,
        validation_message,
    },
    query::{build_pagination, ListQuery, Page},
    repository::{authors::AUTHOR_FIELDS, Repository},
    services::parse_id,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors with filtering, sorting, selection and pagination
    pub async fn list(&self, params: &HashMap<String, String>) -> AppResult<Page> {
        let query = ListQuery::from_params(params, &AUTHOR_FIELDS)?;
        let (authors, total) = self.repository.authors.list(&query).await?;

        let items = authors
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to serialize authors: {}", e)))?;

        Ok(Page {
            items: query.apply_select(items),
            pagination: build_pagination(query.page, query.limit, total),
        })
    }

    pub async fn get(&self, raw_id: &str) -> AppResult<Author> {
        let id = parse_id(raw_id, "author")?;
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author not found with id: {}", raw_id)))
    }

    /// Create an author; the name must be unused under case-insensitive
    /// comparison. The duplicate check runs before field validation, so
    /// a taken name wins over any constraint violation in the payload.
    pub async fn create(&self, payload: CreateAuthor) -> AppResult<Author> {
        let name = payload.name.trim();

        if self.repository.authors.name_exists(name).await? {
            return Err(AppError::DuplicateName(
                "Author with this name already exists".to_string(),
            ));
        }

        payload
            .validate()
            .map_err(|e| AppError::Validation(validation_message(&e)))?;

        if name.is_empty() {
            return Err(AppError::Validation("Please add an author name".to_string()));
        }

        self.repository
            .authors
            .create(
                name,
                payload.biography.as_deref(),
                payload.nationality.as_deref(),
            )
            .await
    }

    /// Partial update; only supplied fields are validated and written
    pub async fn update(&self, raw_id: &str, payload: UpdateAuthor) -> AppResult<Author> {
        let id = parse_id(raw_id, "author")?;

        payload
            .validate()
            .map_err(|e| AppError::Validation(validation_message(&e)))?;

        if let Some(ref name) = payload.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Please add an author name".to_string()));
            }
        }

        self.repository
            .authors
            .update(id, &payload)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author not found with id: {}", raw_id)))
    }

    /// Delete an author, refused while any book still references it.
    ///
    /// The dependent check and the delete are separate statements with no
    /// transaction; a book created concurrently can slip in between. The
    /// store enforces no foreign key either, so this stays a documented
    /// consistency gap.
    pub async fn delete(&self, raw_id: &str) -> AppResult<()> {
        let id = parse_id(raw_id, "author")?;

        if self.repository.books.any_by_author(id).await? {
            return Err(AppError::DependencyConflict(
                "Cannot delete author with associated books. Delete the books first.".to_string(),
            ));
        }

        if !self.repository.authors.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Author not found with id: {}",
                raw_id
            )));
        }

        Ok(())
    }

    /// All books referencing an author, plus a minimal author summary
    pub async fn books_by_author(&self, raw_id: &str) -> AppResult<(AuthorSummary, Vec<Book>)> {
        let author = self.get(raw_id).await?;
        let books = self.repository.books.list_by_author(author.id).await?;
        Ok((AuthorSummary::from(&author), books))
    }
}
