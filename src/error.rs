use thiserror::Error;

/// Everything a command handler can fail with. The dispatcher in
/// `commands::handle` is the single place these are caught and turned into a
/// user-visible failure notice; nothing here is retried or process-fatal.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("query rejected: {0}")]
    InvalidQuery(String),
    #[error("no eligible movie suggestions available")]
    InsufficientCandidates,
    #[error("no active vote round was found")]
    RoundNotFound,
    #[error("no votes have been cast")]
    NoVotes,
    #[error("the current round has already been resolved")]
    RoundResolved,
    #[error("you do not have permission to run this command")]
    PermissionDenied,
    #[error("discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}
