//! Books repository for database operations.
//!
//! List and get queries LEFT JOIN the authors table so the `author`
//! reference comes back expanded in a single round-trip.

use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{Book, BookWithAuthor, CreateBook, UpdateBook},
    },
    query::{FieldKind, FieldSchema, FieldSpec, ListQuery},
    repository::bind_filters,
};

/// Allow-listed fields for book list queries. Columns are qualified
/// because the list query joins the authors table.
pub const BOOK_FIELDS: FieldSchema = FieldSchema {
    fields: &[
        FieldSpec {
            param: "title",
            column: "b.title",
            kind: FieldKind::Text,
        },
        FieldSpec {
            param: "description",
            column: "b.description",
            kind: FieldKind::Text,
        },
        FieldSpec {
            param: "isbn",
            column: "b.isbn",
            kind: FieldKind::Text,
        },
        FieldSpec {
            param: "author",
            column: "b.author_id",
            kind: FieldKind::Uuid,
        },
        FieldSpec {
            param: "publishedDate",
            column: "b.published_date",
            kind: FieldKind::Date,
        },
        FieldSpec {
            param: "createdAt",
            column: "b.created_at",
            kind: FieldKind::Timestamp,
        },
    ],
};

const BOOK_COLUMNS: &str = "b.id, b.title, b.description, b.isbn, b.author_id, b.published_date, b.created_at";

const EXPANDED_COLUMNS: &str = "b.id, b.title, b.description, b.isbn, b.published_date, b.created_at, \
     a.id AS author_id, a.name AS author_name, a.biography AS author_biography, \
     a.nationality AS author_nationality, a.created_at AS author_created_at";

fn expanded_from_row(row: &PgRow) -> Result<BookWithAuthor, sqlx::Error> {
    let author_id: Option<Uuid> = row.try_get("author_id")?;
    let author = match author_id {
        Some(id) => Some(Author {
            id,
            name: row.try_get("author_name")?,
            biography: row.try_get("author_biography")?,
            nationality: row.try_get("author_nationality")?,
            created_at: row.try_get("author_created_at")?,
        }),
        None => None,
    };

    Ok(BookWithAuthor {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        isbn: row.try_get("isbn")?,
        author,
        published_date: row.try_get("published_date")?,
        created_at: row.try_get("created_at")?,
    })
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books for a filtered, sorted page with authors expanded,
    /// plus the pre-pagination total
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<BookWithAuthor>, i64)> {
        let where_clause = query.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM books b {}", where_clause);
        let total: i64 = bind_filters!(sqlx::query_scalar(&count_sql), &query.filters)
            .fetch_one(&self.pool)
            .await?;

        let select_sql = format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id {} {} LIMIT {} OFFSET {}",
            EXPANDED_COLUMNS,
            where_clause,
            query.order_by(),
            query.limit,
            query.offset()
        );
        let rows = bind_filters!(sqlx::query(&select_sql), &query.filters)
            .fetch_all(&self.pool)
            .await?;

        let books = rows
            .iter()
            .map(expanded_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((books, total))
    }

    /// Fetch a book with its author expanded
    pub async fn find_with_author(&self, id: Uuid) -> AppResult<Option<BookWithAuthor>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            EXPANDED_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(expanded_from_row).transpose().map_err(Into::into)
    }

    /// Fetch the raw book row (author as id)
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b WHERE b.id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    /// Check if an ISBN is already taken, optionally excluding one book
    /// (self-exclusion for updates)
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Check whether any book references the given author
    pub async fn any_by_author(&self, author_id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE author_id = $1)")
                .bind(author_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// All books referencing the given author, raw (author as id)
    pub async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b WHERE b.author_id = $1 ORDER BY b.created_at DESC",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    pub async fn create(&self, book: &CreateBook) -> AppResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO books (id, title, description, isbn, author_id, published_date, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(book.title.trim())
        .bind(book.description.as_deref())
        .bind(book.isbn.as_str())
        .bind(book.author)
        .bind(book.published_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Partial update; absent fields keep their stored value.
    /// `created_at` is never touched.
    pub async fn update(&self, id: Uuid, update: &UpdateBook) -> AppResult<()> {
        sqlx::query(
            "UPDATE books SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                isbn = COALESCE($3, isbn), \
                author_id = COALESCE($4, author_id), \
                published_date = COALESCE($5, published_date) \
             WHERE id = $6",
        )
        .bind(update.title.as_ref().map(|s| s.trim().to_string()))
        .bind(update.description.as_deref())
        .bind(update.isbn.as_deref())
        .bind(update.author)
        .bind(update.published_date)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete by id; returns false when no such book existed
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
