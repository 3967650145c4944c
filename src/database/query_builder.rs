use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use crate::sql::SqlValue;

/// Join the non-empty parts of a statement with single spaces
pub fn assemble(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prepare `sql` and bind `params` to its placeholders in order
pub fn query_as_with<'q, O>(sql: &'q str, params: Vec<SqlValue>) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    if crate::config::CONFIG.database.enable_query_logging {
        tracing::debug!(sql, params = ?params, "executing query");
    }
    params
        .into_iter()
        .fold(sqlx::query_as::<_, O>(sql), bind_param_query_as)
}

pub fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: SqlValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlValue::Bool(b) => q.bind(b),
        SqlValue::Int(i) => q.bind(i),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Decimal(d) => q.bind(d),
    }
}
