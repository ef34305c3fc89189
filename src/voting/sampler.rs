use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BotError;
use crate::models::Suggestion;

/// Picks at most `k` candidates for a round, each eligible suggestion
/// equally likely, in randomized display order. Shuffle-then-truncate keeps
/// the subset uniform without a second pass.
pub fn sample<R: Rng>(
    rng: &mut R,
    mut eligible: Vec<Suggestion>,
    k: usize,
) -> Result<Vec<Suggestion>, BotError> {
    if eligible.is_empty() {
        return Err(BotError::InsufficientCandidates);
    }
    eligible.shuffle(rng);
    eligible.truncate(k);
    Ok(eligible)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn suggestions(n: i64) -> Vec<Suggestion> {
        (1..=n)
            .map(|id| Suggestion {
                id,
                title: format!("movie-{}", id),
                suggestion_count: 1,
                won: false,
                date_won: None,
            })
            .collect()
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample(&mut rng, Vec::new(), 3),
            Err(BotError::InsufficientCandidates)
        ));
    }

    #[test]
    fn small_pool_returns_everything_once() {
        let mut rng = StdRng::seed_from_u64(2);
        let round = sample(&mut rng, suggestions(2), 3).unwrap();
        assert_eq!(round.len(), 2);
        let ids: HashSet<i64> = round.iter().map(|s| s.id).collect();
        assert_eq!(ids, HashSet::from([1, 2]));
    }

    #[test]
    fn large_pool_returns_exactly_k_distinct() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let round = sample(&mut rng, suggestions(10), 3).unwrap();
            assert_eq!(round.len(), 3);
            let ids: HashSet<i64> = round.iter().map(|s| s.id).collect();
            assert_eq!(ids.len(), 3);
            assert!(ids.iter().all(|id| (1..=10).contains(id)));
        }
    }

    #[test]
    fn every_candidate_shows_up_eventually() {
        let mut seen = HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for s in sample(&mut rng, suggestions(5), 2).unwrap() {
                seen.insert(s.id);
            }
        }
        assert_eq!(seen.len(), 5);
    }
}
