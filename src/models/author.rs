//! Author model and request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Author record as stored and returned by the API
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub biography: Option<String>,
    pub nationality: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal author summary attached to the books-by-author response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.name.clone(),
        }
    }
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    #[validate(length(max = 50, message = "Author name cannot be more than 50 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Biography cannot be more than 500 characters"))]
    pub biography: Option<String>,
    #[validate(length(max = 50, message = "Nationality cannot be more than 50 characters"))]
    pub nationality: Option<String>,
}

/// Update author request (all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthor {
    #[validate(length(max = 50, message = "Author name cannot be more than 50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Biography cannot be more than 500 characters"))]
    pub biography: Option<String>,
    #[validate(length(max = 50, message = "Nationality cannot be more than 50 characters"))]
    pub nationality: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation_message;

    #[test]
    fn oversized_name_is_rejected() {
        let payload = CreateAuthor {
            name: "x".repeat(51),
            biography: None,
            nationality: None,
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Author name cannot be more than 50 characters"
        );
    }

    #[test]
    fn optional_fields_are_bounded() {
        let payload = CreateAuthor {
            name: "Tolkien".into(),
            biography: Some("b".repeat(501)),
            nationality: Some("n".repeat(51)),
        };
        let errors = payload.validate().unwrap_err();
        let message = validation_message(&errors);
        assert!(message.contains("Biography cannot be more than 500 characters"));
        assert!(message.contains("Nationality cannot be more than 50 characters"));
    }

    #[test]
    fn valid_payload_passes() {
        let payload = CreateAuthor {
            name: "J.R.R. Tolkien".into(),
            biography: Some("English writer".into()),
            nationality: Some("British".into()),
        };
        assert!(payload.validate().is_ok());
    }
}
