//! Book endpoints

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
        book::{BookWithAuthor, CreateBook, UpdateBook},
        user::Role,
    },
};

use super::{AuthenticatedUser, EmptyEnvelope, ListEnvelope};

/// Single-book response envelope (author expanded)
#[derive(Serialize, ToSchema)]
pub struct BookEnvelope {
    pub success: bool,
    pub data: BookWithAuthor,
}

/// List books with filtering, sorting and pagination; authors expanded
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("select" = Option<String>, Query, description = "Comma-separated fields to return"),
        ("sort" = Option<String>, Query, description = "Comma-separated sort keys, - prefix for descending"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<i64>, Query, description = "Records per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Page of books", body = ListEnvelope),
        (status = 400, description = "Unknown filter field or operator")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope>> {
    let page = state.services.books.list(&params).await?;
    Ok(Json(ListEnvelope::from_page(page)))
}

/// Get a single book by id, author expanded
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookEnvelope),
        (status = 400, description = "Malformed book ID"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookEnvelope>> {
    let book = state.services.books.get(&id).await?;
    Ok(Json(BookEnvelope {
        success: true,
        data: book,
    }))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookEnvelope),
        (status = 400, description = "Validation failure or duplicate ISBN"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Referenced author not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(payload): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookEnvelope>)> {
    let book = state.services.books.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookEnvelope {
            success: true,
            data: book,
        }),
    ))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookEnvelope),
        (status = 400, description = "Malformed ID, validation failure or duplicate ISBN"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book or referenced author not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBook>,
) -> AppResult<Json<BookEnvelope>> {
    let book = state.services.books.update(&id, payload).await?;
    Ok(Json(BookEnvelope {
        success: true,
        data: book,
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = EmptyEnvelope),
        (status = 400, description = "Malformed book ID"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not permitted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<EmptyEnvelope>> {
    claims.require_role(&[Role::Admin])?;
    state.services.books.delete(&id).await?;
    Ok(Json(EmptyEnvelope::ok()))
}
