//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Bind every filter value of a list query onto a sqlx query, in the
/// order the WHERE clause numbered them.
macro_rules! bind_filters {
    ($query:expr, $filters:expr) => {{
        let mut q = $query;
        for f in $filters {
            q = match &f.value {
                $crate::query::BindValue::Text(v) => q.bind(v.clone()),
                $crate::query::BindValue::Date(v) => q.bind(*v),
                $crate::query::BindValue::Timestamp(v) => q.bind(*v),
                $crate::query::BindValue::Uuid(v) => q.bind(*v),
                $crate::query::BindValue::TextList(v) => q.bind(v.clone()),
                $crate::query::BindValue::DateList(v) => q.bind(v.clone()),
                $crate::query::BindValue::TimestampList(v) => q.bind(v.clone()),
                $crate::query::BindValue::UuidList(v) => q.bind(v.clone()),
            };
        }
        q
    }};
}

pub(crate) use bind_filters;
