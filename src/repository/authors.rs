//! Authors repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::author::{Author, UpdateAuthor},
    query::{FieldKind, FieldSchema, FieldSpec, ListQuery},
    repository::bind_filters,
};

/// Allow-listed fields for author list queries
pub const AUTHOR_FIELDS: FieldSchema = FieldSchema {
    fields: &[
        FieldSpec {
            param: "name",
            column: "name",
            kind: FieldKind::Text,
        },
        FieldSpec {
            param: "biography",
            column: "biography",
            kind: FieldKind::Text,
        },
        FieldSpec {
            param: "nationality",
            column: "nationality",
            kind: FieldKind::Text,
        },
        FieldSpec {
            param: "createdAt",
            column: "created_at",
            kind: FieldKind::Timestamp,
        },
    ],
};

const AUTHOR_COLUMNS: &str = "id, name, biography, nationality, created_at";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors for a filtered, sorted page, plus the pre-pagination total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Author>, i64)> {
        let where_clause = query.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM authors {}", where_clause);
        let total: i64 = bind_filters!(sqlx::query_scalar(&count_sql), &query.filters)
            .fetch_one(&self.pool)
            .await?;

        let select_sql = format!(
            "SELECT {} FROM authors {} {} LIMIT {} OFFSET {}",
            AUTHOR_COLUMNS,
            where_clause,
            query.order_by(),
            query.limit,
            query.offset()
        );
        let authors = bind_filters!(sqlx::query_as::<_, Author>(&select_sql), &query.filters)
            .fetch_all(&self.pool)
            .await?;

        Ok((authors, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    /// Check whether an author with this name exists, case-insensitively
    pub async fn name_exists(&self, name: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE LOWER(name) = LOWER($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(
        &self,
        name: &str,
        biography: Option<&str>,
        nationality: Option<&str>,
    ) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "INSERT INTO authors (id, name, biography, nationality, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            AUTHOR_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(biography)
        .bind(nationality)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    /// Partial update; absent fields keep their stored value.
    /// `created_at` is never touched.
    pub async fn update(&self, id: Uuid, update: &UpdateAuthor) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "UPDATE authors SET \
                name = COALESCE($1, name), \
                biography = COALESCE($2, biography), \
                nationality = COALESCE($3, nationality) \
             WHERE id = $4 RETURNING {}",
            AUTHOR_COLUMNS
        ))
        .bind(update.name.as_ref().map(|s| s.trim().to_string()))
        .bind(update.biography.as_deref())
        .bind(update.nationality.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    /// Delete by id; returns false when no such author existed
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
