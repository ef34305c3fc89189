//! The rendered round embed doubles as the round's durable record: the
//! description lines written here are what `parse` reads back when the
//! in-memory registry is gone (say, after a restart). Render and parse must
//! agree on the line format exactly, so both live in this module.

use crate::error::BotError;
use crate::models::Suggestion;

/// Embed title used to relocate a round message among recent channel
/// history. Changing this orphans every round already on screen.
pub const ROUND_TITLE: &str = "Vote for Tomorrow's Movie";

/// How many recent messages the fallback scan looks through.
pub const SCAN_WINDOW: u64 = 50;

/// One description line per candidate: `"N. Title (X suggestions)"`.
pub fn render(candidates: &[Suggestion]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} ({} suggestions)", i + 1, s.title, s.suggestion_count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recovers the ordered candidate titles from a rendered description.
/// Lines that don't match the render format are skipped rather than
/// guessed at.
pub fn parse(description: &str) -> Vec<String> {
    description.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<String> {
    let (index, rest) = line.split_once(". ")?;
    index.trim().parse::<usize>().ok()?;
    // rsplit so titles containing " (" keep their parentheses
    let (title, trailer) = rest.rsplit_once(" (")?;
    trailer.strip_suffix(" suggestions)")?.parse::<i64>().ok()?;
    Some(title.to_string())
}

/// Keycap emoji for a 1-based candidate index, e.g. `1️⃣`.
pub fn vote_emoji(index: usize) -> String {
    format!("{}\u{FE0F}\u{20E3}", index)
}

/// Maps a reaction symbol back to its 1-based candidate index.
pub fn emoji_index(emoji: &str) -> Option<usize> {
    let digit = emoji.strip_suffix("\u{FE0F}\u{20E3}")?;
    digit.parse().ok().filter(|i| (1..=9).contains(i))
}

/// Picks the winning candidate index (0-based) from per-candidate vote
/// counts. The strictly greatest count wins; a tie goes to the lowest
/// index. All-zero counts mean nobody voted.
pub fn resolve_tally(counts: &[u64]) -> Result<usize, BotError> {
    let mut winner: Option<(usize, u64)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if count > 0 && winner.map_or(true, |(_, best)| count > best) {
            winner = Some((index, count));
        }
    }
    winner.map(|(index, _)| index).ok_or(BotError::NoVotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(titles: &[(&str, i64)]) -> Vec<Suggestion> {
        titles
            .iter()
            .enumerate()
            .map(|(i, (title, count))| Suggestion {
                id: i as i64 + 1,
                title: title.to_string(),
                suggestion_count: *count,
                won: false,
                date_won: None,
            })
            .collect()
    }

    #[test]
    fn renders_the_stable_line_format() {
        let body = render(&candidates(&[("Dune", 2), ("Heat", 1)]));
        assert_eq!(body, "1. Dune (2 suggestions)\n2. Heat (1 suggestions)");
    }

    #[test]
    fn render_parse_round_trip() {
        let round = candidates(&[
            ("Dune", 2),
            ("Mission: Impossible (1996)", 1),
            ("O Brother, Where Art Thou?", 4),
        ]);
        let titles = parse(&render(&round));
        assert_eq!(
            titles,
            vec![
                "Dune",
                "Mission: Impossible (1996)",
                "O Brother, Where Art Thou?"
            ]
        );
    }

    #[test]
    fn parse_skips_lines_that_are_not_candidates() {
        let text = "1. Dune (2 suggestions)\n\nReact with the number of your choice!";
        assert_eq!(parse(text), vec!["Dune"]);
        assert!(parse("nothing to see here").is_empty());
    }

    #[test]
    fn emoji_mapping_round_trips() {
        for index in 1..=9 {
            assert_eq!(emoji_index(&vote_emoji(index)), Some(index));
        }
        assert_eq!(vote_emoji(1), "1\u{FE0F}\u{20E3}");
        assert_eq!(emoji_index("🎉"), None);
        assert_eq!(emoji_index("0\u{FE0F}\u{20E3}"), None);
    }

    #[test]
    fn highest_count_wins() {
        assert_eq!(resolve_tally(&[2, 5, 1]).unwrap(), 1);
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        assert_eq!(resolve_tally(&[3, 3]).unwrap(), 0);
        assert_eq!(resolve_tally(&[0, 4, 4]).unwrap(), 1);
    }

    #[test]
    fn no_votes_is_an_error() {
        assert!(matches!(resolve_tally(&[0, 0, 0]), Err(BotError::NoVotes)));
        assert!(matches!(resolve_tally(&[]), Err(BotError::NoVotes)));
    }
}
