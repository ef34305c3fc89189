use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::Database;
use crate::error::BotError;

const ALLOWED_VERBS: [&str; 5] = ["SELECT", "INSERT", "UPDATE", "DELETE", "ALTER"];

#[derive(Debug)]
pub enum QueryOutcome {
    Rows(Vec<String>),
    Affected(u64),
}

impl Database {
    /// Irreversible bulk wipe of the suggestion table.
    pub async fn delete_all(&self) -> Result<u64, BotError> {
        Ok(sqlx::query("DELETE FROM movie_suggestions")
            .execute(&self.pool)
            .await?
            .rows_affected())
    }

    /// Operational trapdoor: runs an arbitrary statement, but only if its
    /// first token is on the verb allow-list. The check happens on the
    /// trimmed, upper-cased token before anything reaches the database, so
    /// casing and leading whitespace cannot sneak a DROP past it. Exactly
    /// one statement is accepted: the driver would happily execute every
    /// statement in the string, and the gate only vouches for the first.
    pub async fn run_raw_query(&self, sql: &str) -> Result<QueryOutcome, BotError> {
        let sql = sql.trim();
        let statement = sql.strip_suffix(';').map(str::trim_end).unwrap_or(sql);
        if statement.contains(';') {
            return Err(BotError::InvalidQuery(
                "only a single statement is allowed".to_string(),
            ));
        }
        let verb = statement
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        if !ALLOWED_VERBS.contains(&verb.as_str()) {
            return Err(BotError::InvalidQuery(format!("disallowed verb {:?}", verb)));
        }

        if verb == "SELECT" {
            let rows = sqlx::query(statement).fetch_all(&self.pool).await?;
            Ok(QueryOutcome::Rows(rows.iter().map(format_row).collect()))
        } else {
            let result = sqlx::query(statement).execute(&self.pool).await?;
            Ok(QueryOutcome::Affected(result.rows_affected()))
        }
    }
}

fn format_row(row: &SqliteRow) -> String {
    row.columns()
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{}={}", column.name(), render_value(row, index)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_value(row: &SqliteRow, index: usize) -> String {
    let type_name = {
        let raw = match row.try_get_raw(index) {
            Ok(raw) => raw,
            Err(_) => return "?".to_string(),
        };
        if raw.is_null() {
            return "NULL".to_string();
        }
        raw.type_info().name().to_string()
    };
    match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<i64, _>(index)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "REAL" => row
            .try_get::<f64, _>(index)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "?".to_string()),
        "BLOB" => "<blob>".to_string(),
        _ => row
            .try_get::<String, _>(index)
            .unwrap_or_else(|_| "?".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_all_wipes_the_table() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();
        db.add_or_increment("Heat").await.unwrap();
        assert_eq!(db.delete_all().await.unwrap(), 2);
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_disallowed_verbs_without_touching_the_database() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();

        for sql in [
            "DROP TABLE movie_suggestions",
            "  drop table movie_suggestions",
            "\tDrOp TABLE movie_suggestions  ",
            "PRAGMA table_info(movie_suggestions)",
            "",
        ] {
            assert!(
                matches!(db.run_raw_query(sql).await, Err(BotError::InvalidQuery(_))),
                "verb gate let through {:?}",
                sql
            );
        }

        // table unharmed
        assert_eq!(db.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_multi_statement_input_before_execution() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();

        for sql in [
            "SELECT 1; DROP TABLE movie_suggestions",
            "DELETE FROM movie_suggestions; SELECT 1",
            "SELECT 1;;",
            "SELECT 1 ; DrOp TABLE movie_suggestions ; ",
        ] {
            assert!(
                matches!(db.run_raw_query(sql).await, Err(BotError::InvalidQuery(_))),
                "statement gate let through {:?}",
                sql
            );
        }

        // a single trailing terminator is just punctuation
        let outcome = db
            .run_raw_query("SELECT title FROM movie_suggestions;")
            .await
            .unwrap();
        assert!(matches!(outcome, QueryOutcome::Rows(lines) if lines.len() == 1));

        // nothing past the gate ran
        assert_eq!(db.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn select_returns_formatted_rows() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();

        let outcome = db
            .run_raw_query("select title, suggestion_count, date_won FROM movie_suggestions")
            .await
            .unwrap();
        match outcome {
            QueryOutcome::Rows(lines) => {
                assert_eq!(lines.len(), 1);
                assert_eq!(lines[0], "title=Dune, suggestion_count=1, date_won=NULL");
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn mutations_report_affected_rows() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();
        db.add_or_increment("Heat").await.unwrap();

        let outcome = db
            .run_raw_query("UPDATE movie_suggestions SET suggestion_count = 5")
            .await
            .unwrap();
        assert!(matches!(outcome, QueryOutcome::Affected(2)));
    }
}
