use chrono::{Duration, NaiveDate};

use crate::models::Suggestion;

pub fn cutoff_date(today: NaiveDate, cooldown_days: i64) -> NaiveDate {
    today - Duration::days(cooldown_days)
}

/// A suggestion that has never won is always eligible; a past winner only
/// becomes eligible again once its win date predates the cutoff. `won` is a
/// permanent historical marker and is never cleared.
pub fn is_eligible(suggestion: &Suggestion, cutoff: NaiveDate) -> bool {
    !suggestion.won || suggestion.date_won.map_or(false, |won| won < cutoff)
}

pub fn eligible(suggestions: Vec<Suggestion>, cutoff: NaiveDate) -> Vec<Suggestion> {
    suggestions
        .into_iter()
        .filter(|s| is_eligible(s, cutoff))
        .collect()
}
