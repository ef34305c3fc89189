/// One movie in the suggestion table. `title` is unique case-insensitively;
/// `date_won` is ISO `yyyy-MM-dd` text in the database and is only ever set
/// together with `won`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Suggestion {
    pub id: i64,
    pub title: String,
    pub suggestion_count: i64,
    pub won: bool,
    pub date_won: Option<chrono::NaiveDate>,
}
