use chrono::NaiveDate;

use super::Database;
use crate::error::BotError;
use crate::models::Suggestion;
use crate::voting::eligibility;

const SELECT_COLUMNS: &str =
    "SELECT id, title, suggestion_count, won, date_won FROM movie_suggestions";

impl Database {
    /// Records a suggestion. A repeat of an already-known title (compared
    /// case-insensitively) bumps its counter instead of inserting a
    /// duplicate row. Returns the row as it looks after the write.
    pub async fn add_or_increment(&self, title: &str) -> Result<Suggestion, BotError> {
        match self.get_by_title(title).await? {
            Some(existing) => {
                sqlx::query(
                    "UPDATE movie_suggestions
                     SET suggestion_count = suggestion_count + 1 WHERE id = ?",
                )
                .bind(existing.id)
                .execute(&self.pool)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO movie_suggestions (title, suggestion_count, won)
                     VALUES (?, 1, 0)",
                )
                .bind(title)
                .execute(&self.pool)
                .await?;
            }
        }
        self.get_by_title(title)
            .await?
            .ok_or(BotError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn get_by_title(&self, title: &str) -> Result<Option<Suggestion>, BotError> {
        // The title column is COLLATE NOCASE, so this lookup is already
        // case-insensitive.
        Ok(
            sqlx::query_as::<_, Suggestion>(&format!("{} WHERE title = ?", SELECT_COLUMNS))
                .bind(title)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn list_all(&self) -> Result<Vec<Suggestion>, BotError> {
        Ok(
            sqlx::query_as::<_, Suggestion>(&format!("{} ORDER BY id", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Suggestions that may enter a new vote round: never won, or won long
    /// enough ago that `date_won` predates the cutoff. The predicate lives
    /// in `voting::eligibility` so the store and the pure filter can never
    /// drift apart.
    pub async fn list_eligible(&self, cutoff: NaiveDate) -> Result<Vec<Suggestion>, BotError> {
        Ok(eligibility::eligible(self.list_all().await?, cutoff))
    }

    /// Marks a suggestion as the round winner. The id must come from a
    /// just-read eligible set; an unknown id is a logic error upstream and
    /// surfaces as a storage failure.
    pub async fn record_win(&self, id: i64, date: NaiveDate) -> Result<(), BotError> {
        let result = sqlx::query("UPDATE movie_suggestions SET won = 1, date_won = ? WHERE id = ?")
            .bind(date)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BotError::Storage(sqlx::Error::RowNotFound));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::{eligibility::cutoff_date, COOLDOWN_DAYS};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn repeat_suggestion_increments_instead_of_duplicating() {
        let db = Database::in_memory().await;
        let first = db.add_or_increment("Dune").await.unwrap();
        assert_eq!(first.suggestion_count, 1);
        assert!(!first.won);

        let second = db.add_or_increment("dune").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.suggestion_count, 2);
        // first-seen casing is the stored one
        assert_eq!(second.title, "Dune");

        assert_eq!(db.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_win_drives_the_eligibility_window() {
        let db = Database::in_memory().await;
        let row = db.add_or_increment("Heat").await.unwrap();

        let today = day("2026-08-27");
        db.record_win(row.id, today).await.unwrap();

        let row = db.get_by_title("heat").await.unwrap().unwrap();
        assert!(row.won);
        assert_eq!(row.date_won, Some(today));

        // same-day cutoff excludes it...
        assert!(db.list_eligible(today).await.unwrap().is_empty());
        // ...and a cutoff past the win date lets it back in
        let eligible = db.list_eligible(day("2026-09-04")).await.unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].title, "Heat");
    }

    #[tokio::test]
    async fn record_win_rejects_unknown_id() {
        let db = Database::in_memory().await;
        assert!(matches!(
            db.record_win(42, day("2026-08-27")).await,
            Err(BotError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn suggest_vote_select_scenario() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();
        let dune = db.add_or_increment("DUNE").await.unwrap();
        assert_eq!(dune.suggestion_count, 2);

        let today = day("2026-08-27");
        let eligible = db.list_eligible(cutoff_date(today, COOLDOWN_DAYS)).await.unwrap();
        assert_eq!(eligible.len(), 1);

        db.record_win(eligible[0].id, today).await.unwrap();
        let after = db
            .list_eligible(cutoff_date(today, COOLDOWN_DAYS))
            .await
            .unwrap();
        assert!(after.is_empty());
    }
}
