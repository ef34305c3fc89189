use serenity::http::Http;
use serenity::model::channel::ReactionType;
use serenity::model::id::ChannelId;

use crate::commands::{EMBED_COLOUR, FOOTER};
use crate::database::Database;
use crate::error::BotError;
use crate::voting::registry::{ActiveRound, RoundRegistry};
use crate::voting::{eligibility, round, sampler, COOLDOWN_DAYS, ROUND_SIZE};

/// Starts a vote round in `channel`: samples the eligible suggestions,
/// posts the round embed, seeds one keycap reaction per candidate and
/// installs the round record. Used by both the daily trigger and /vote.
pub async fn start_round(
    http: &Http,
    db: &Database,
    rounds: &RoundRegistry,
    channel: ChannelId,
) -> Result<(), BotError> {
    let today = chrono::Local::now().date_naive();
    let eligible = db
        .list_eligible(eligibility::cutoff_date(today, COOLDOWN_DAYS))
        .await?;
    let candidates = sampler::sample(&mut rand::thread_rng(), eligible, ROUND_SIZE)?;
    let body = round::render(&candidates);

    let message = channel
        .send_message(http, |message| {
            message.embed(|embed| {
                embed.title(round::ROUND_TITLE);
                embed.description(&body);
                embed.colour(EMBED_COLOUR);
                embed.footer(|footer| footer.text(FOOTER))
            })
        })
        .await?;
    for index in 1..=candidates.len() {
        message
            .react(http, ReactionType::Unicode(round::vote_emoji(index)))
            .await?;
    }

    let displaced = rounds
        .begin(ActiveRound {
            channel_id: channel.0,
            message_id: message.id.0,
            started: chrono::Local::now().naive_local(),
            candidates,
            resolved: false,
        })
        .await;
    if let Some(previous) = displaced {
        if !previous.resolved {
            warn!(
                "new round displaced unresolved round from {} (message {})",
                previous.started, previous.message_id
            );
        }
    }
    info!("vote round started in channel {}", channel.0);
    Ok(())
}
