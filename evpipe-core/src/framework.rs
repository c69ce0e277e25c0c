use sqlx::SqlitePool;

/// Handle that database queries are processed on.
///
/// Each query is a plain struct with an
/// `impl Processor<Query> for DatabaseProcessor`.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: SqlitePool,
}
