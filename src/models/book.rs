//! Book model and request types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::author::Author;

/// Book record with the raw author reference, as stored
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub isbn: String,
    /// Referenced author id
    #[serde(rename = "author")]
    pub author_id: Uuid,
    pub published_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Book with the author reference expanded to the full author record.
/// `author` is null when the referenced author no longer exists (the
/// store enforces no foreign key).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub isbn: String,
    pub author: Option<Author>,
    pub published_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(max = 100, message = "Title cannot be more than 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 20, message = "ISBN cannot be more than 20 characters"))]
    pub isbn: String,
    /// Referenced author id
    pub author: Uuid,
    pub published_date: Option<NaiveDate>,
}

/// Update book request (all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(max = 100, message = "Title cannot be more than 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 20, message = "ISBN cannot be more than 20 characters"))]
    pub isbn: Option<String>,
    /// New author id, re-validated against the author collection when present
    pub author: Option<Uuid>,
    pub published_date: Option<NaiveDate>,
}
