use sqlx::SqlitePool;

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

const SCHEMA_VERSION: &str = "1.0.0";

/// Applies the embedded schema once. Re-running against an already
/// initialized database is a no-op keyed on `_db_metadata.schema_version`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let version: Option<String> =
        sqlx::query_scalar("SELECT value FROM _db_metadata WHERE key = 'schema_version'")
            .fetch_optional(pool)
            .await
            .unwrap_or(None);

    if version.is_some() {
        return Ok(());
    }

    for stmt in split_sql_statements(SCHEMA_SQL) {
        sqlx::query(&stmt).execute(pool).await?;
    }

    sqlx::query("INSERT OR REPLACE INTO _db_metadata (key, value) VALUES ('schema_version', ?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Splits a schema file into executable statements on semicolons outside
/// string literals, dropping `--` comment lines along the way.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let stripped: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;

    for ch in stripped.chars() {
        match ch {
            '\'' => {
                in_single_quote = !in_single_quote;
                current.push(ch);
            }
            ';' if !in_single_quote => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}
