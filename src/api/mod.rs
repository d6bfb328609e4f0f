//! API handlers for the Bookshelf REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, query::Pagination, AppState};

/// List response envelope shared by the author and book collections.
/// `count` is the size of the returned page, not the total.
#[derive(Serialize, ToSchema)]
pub struct ListEnvelope {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<serde_json::Value>,
}

impl ListEnvelope {
    pub fn from_page(page: crate::query::Page) -> Self {
        Self {
            success: true,
            count: page.items.len(),
            pagination: page.pagination,
            data: page.items,
        }
    }
}

/// Success envelope with an empty data object, returned by deletes
#[derive(Serialize, ToSchema)]
pub struct EmptyEnvelope {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl EmptyEnvelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: serde_json::json!({}),
        }
    }
}

/// Extractor for the authenticated user behind a bearer token.
///
/// Every failure mode (missing header, wrong scheme, malformed, expired
/// or forged token) collapses into the same 401 so callers cannot
/// distinguish cause.
pub struct AuthenticatedUser(pub UserClaims);

fn unauthorized() -> AppError {
    AppError::Unauthorized("Not authorized to access this route".to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(unauthorized)?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| unauthorized())?;

        Ok(AuthenticatedUser(claims))
    }
}
