use rand::seq::SliceRandom;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::ReactionType;
use serenity::model::id::ChannelId;
use serenity::prelude::Context;

use crate::commands::{announce_embed, ensure_admin, respond_embed};
use crate::database::Database;
use crate::error::BotError;
use crate::extensions::*;
use crate::models::Suggestion;
use crate::voting::{eligibility, round, COOLDOWN_DAYS};

/// The round being resolved, whichever way it was located. `claimed` is
/// true when it came out of the registry, in which case a failed resolution
/// has to reopen it.
struct RoundContext {
    channel_id: u64,
    message_id: u64,
    candidates: Vec<Suggestion>,
    claimed: bool,
}

pub fn register(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("select")
        .description("Select the winner or a random movie from the current voting options")
        .create_option(|option| {
            option
                .name("option")
                .description("How the winner should be picked")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("Winner", "winner")
                .add_string_choice("Random (this round)", "random")
                .add_string_choice("Random (all eligible)", "random-eligible")
        })
}

pub async fn run(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), BotError> {
    ensure_admin(command)?;

    let mode = command
        .data
        .options
        .by_name("option")
        .and_then(|option| option.as_str())
        .unwrap_or("winner")
        .to_string();
    let db = ctx.get_db().await;
    let rounds = ctx.get_rounds().await;

    let round_ctx = match rounds.try_claim().await {
        Ok(active) => RoundContext {
            channel_id: active.channel_id,
            message_id: active.message_id,
            candidates: active.candidates,
            claimed: true,
        },
        // No in-memory record (e.g. the bot restarted mid-round): fall back
        // to relocating the round message and reparsing it. This path has
        // no double-resolution guard.
        Err(BotError::RoundNotFound) => scan_for_round(ctx, command, &db).await?,
        Err(err) => return Err(err),
    };

    let winner = match pick_winner(ctx, &db, &mode, &round_ctx).await {
        Ok(winner) => winner,
        Err(err) => {
            if round_ctx.claimed {
                rounds.reopen().await;
            }
            return Err(err);
        }
    };

    let today = chrono::Local::now().date_naive();
    if let Err(err) = db.record_win(winner.id, today).await {
        if round_ctx.claimed {
            rounds.reopen().await;
        }
        return Err(err);
    }
    info!("{:?} won the vote round ({})", winner.title, mode);

    let (title, notice) = if mode == "winner" {
        ("Winner Selected", format!("The winning movie is:\n\n**{}**", winner.title))
    } else {
        (
            "Random Movie Selected",
            format!("The randomly selected movie is:\n\n**{}**", winner.title),
        )
    };
    announce_embed(ctx, ChannelId(round_ctx.channel_id), title, &notice).await?;
    respond_embed(ctx, command, title, &notice).await?;
    Ok(())
}

async fn pick_winner(
    ctx: &Context,
    db: &Database,
    mode: &str,
    round_ctx: &RoundContext,
) -> Result<Suggestion, BotError> {
    match mode {
        "winner" => {
            let message = ctx
                .http
                .get_message(round_ctx.channel_id, round_ctx.message_id)
                .await?;
            let mut counts = vec![0u64; round_ctx.candidates.len()];
            for reaction in &message.reactions {
                if let ReactionType::Unicode(symbol) = &reaction.reaction_type {
                    if let Some(index) = round::emoji_index(symbol) {
                        if index <= counts.len() {
                            // the bot seeds each emoji once; that is not a vote
                            counts[index - 1] = if reaction.me {
                                reaction.count.saturating_sub(1)
                            } else {
                                reaction.count
                            };
                        }
                    }
                }
            }
            let index = round::resolve_tally(&counts)?;
            Ok(round_ctx.candidates[index].clone())
        }
        "random-eligible" => {
            let cutoff = eligibility::cutoff_date(chrono::Local::now().date_naive(), COOLDOWN_DAYS);
            let pool = db.list_eligible(cutoff).await?;
            pool.choose(&mut rand::thread_rng())
                .cloned()
                .ok_or(BotError::InsufficientCandidates)
        }
        _ => round_ctx
            .candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(BotError::RoundNotFound),
    }
}

/// Relocates the newest round message in the invoking channel by its embed
/// title marker and rebuilds the candidate list from its description lines.
async fn scan_for_round(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    db: &Database,
) -> Result<RoundContext, BotError> {
    let messages = command
        .channel_id
        .messages(&ctx.http, |retriever| retriever.limit(round::SCAN_WINDOW))
        .await?;
    let message = messages
        .iter()
        .find(|message| {
            message
                .embeds
                .first()
                .map_or(false, |embed| embed.title.as_deref() == Some(round::ROUND_TITLE))
        })
        .ok_or(BotError::RoundNotFound)?;

    let description = message
        .embeds
        .first()
        .and_then(|embed| embed.description.as_deref())
        .unwrap_or_default();
    let candidates = candidates_from_titles(db, &round::parse(description)).await?;
    Ok(RoundContext {
        channel_id: message.channel_id.0,
        message_id: message.id.0,
        candidates,
        claimed: false,
    })
}

/// Resolves parsed candidate titles back to their rows, preserving display
/// order. Every line must resolve: dropping one would shift the remaining
/// candidates and credit reaction N to the movie rendered on line N+1, so a
/// missing row (the table was wiped or edited mid-round) fails the whole
/// lookup instead.
async fn candidates_from_titles(
    db: &Database,
    titles: &[String],
) -> Result<Vec<Suggestion>, BotError> {
    let mut candidates = Vec::with_capacity(titles.len());
    for title in titles {
        match db.get_by_title(title).await? {
            Some(row) => candidates.push(row),
            None => {
                warn!("round candidate {:?} is missing from the suggestion table", title);
                return Err(BotError::RoundNotFound);
            }
        }
    }
    if candidates.is_empty() {
        return Err(BotError::RoundNotFound);
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_candidate_fails_the_lookup_instead_of_shifting_indices() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();
        db.add_or_increment("Heat").await.unwrap();

        // "Alien" vanished mid-round; compacting around it would hand
        // Alien's votes to Heat
        let titles = vec!["Dune".to_string(), "Alien".to_string(), "Heat".to_string()];
        assert!(matches!(
            candidates_from_titles(&db, &titles).await,
            Err(BotError::RoundNotFound)
        ));
    }

    #[tokio::test]
    async fn lookup_preserves_display_order() {
        let db = Database::in_memory().await;
        db.add_or_increment("Dune").await.unwrap();
        db.add_or_increment("Heat").await.unwrap();

        let titles = vec!["Heat".to_string(), "Dune".to_string()];
        let candidates = candidates_from_titles(&db, &titles).await.unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(names, ["Heat", "Dune"]);
    }

    #[tokio::test]
    async fn unparseable_round_body_is_round_not_found() {
        let db = Database::in_memory().await;
        assert!(matches!(
            candidates_from_titles(&db, &[]).await,
            Err(BotError::RoundNotFound)
        ));
    }
}
