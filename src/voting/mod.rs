pub mod eligibility;
pub mod registry;
pub mod round;
pub mod sampler;

/// How many candidates a vote round presents at most.
pub const ROUND_SIZE: usize = 3;

/// Days a winner sits out before it can be sampled into a round again.
pub const COOLDOWN_DAYS: i64 = 7;
