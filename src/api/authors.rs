//! Author endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorSummary, CreateAuthor, UpdateAuthor},
        book::Book,
        user::Role,
    },
};

use super::{AuthenticatedUser, EmptyEnvelope, ListEnvelope};

/// Single-author response envelope
#[derive(Serialize, ToSchema)]
pub struct AuthorEnvelope {
    pub success: bool,
    pub data: Author,
}

/// Books-by-author response envelope
#[derive(Serialize, ToSchema)]
pub struct AuthorBooksEnvelope {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Book>,
    pub author: AuthorSummary,
}

/// List authors with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(
        ("select" = Option<String>, Query, description = "Comma-separated fields to return"),
        ("sort" = Option<String>, Query, description = "Comma-separated sort keys, - prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Records per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Page of authors", body = ListEnvelope),
        (status = 400, description = "Unknown filter field or operator")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope>> {
    let page = state.services.authors.list(&params).await?;
    Ok(Json(ListEnvelope::from_page(page)))
}

/// Get a single author by id
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorEnvelope),
        (status = 400, description = "Malformed author ID"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorEnvelope>> {
    let author = state.services.authors.get(&id).await?;
    Ok(Json(AuthorEnvelope {
        success: true,
        data: author,
    }))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorEnvelope),
        (status = 400, description = "Validation failure or duplicate name"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(payload): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<AuthorEnvelope>)> {
    let author = state.services.authors.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthorEnvelope {
            success: true,
            data: author,
        }),
    ))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = AuthorEnvelope),
        (status = 400, description = "Malformed ID or validation failure"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAuthor>,
) -> AppResult<Json<AuthorEnvelope>> {
    let author = state.services.authors.update(&id, payload).await?;
    Ok(Json(AuthorEnvelope {
        success: true,
        data: author,
    }))
}

/// Delete an author (refused while books reference it)
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = EmptyEnvelope),
        (status = 400, description = "Malformed ID or author still has books"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not permitted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<EmptyEnvelope>> {
    claims.require_role(&[Role::Admin])?;
    state.services.authors.delete(&id).await?;
    Ok(Json(EmptyEnvelope::ok()))
}

/// List all books referencing an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by this author", body = AuthorBooksEnvelope),
        (status = 400, description = "Malformed author ID"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author_books(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorBooksEnvelope>> {
    let (author, books) = state.services.authors.books_by_author(&id).await?;
    Ok(Json(AuthorBooksEnvelope {
        success: true,
        count: books.len(),
        data: books,
        author,
    }))
}
