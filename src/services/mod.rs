//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;

use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub auth: auth::AuthService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            auth: auth::AuthService::new(repository, auth_config),
        }
    }
}

/// Parse a raw path id, mapping malformed input to the entity-specific
/// 400 message ("Invalid author ID format" / "Invalid book ID format").
pub(crate) fn parse_id(raw: &str, entity: &str) -> AppResult<Uuid> {
    raw.parse()
        .map_err(|_| AppError::InvalidId(format!("Invalid {} ID format", entity)))
}
