pub mod db;
pub mod select;
pub mod suggest;
pub mod vote;

use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Context;
use serenity::utils::Colour;

use crate::error::BotError;

pub const EMBED_COLOUR: Colour = Colour(0xFFFFFF);
pub const FOOTER: &str = "Hot Rock Make Boat Go";

pub async fn register_all(ctx: &Context, guild_id: GuildId) -> Result<(), serenity::Error> {
    guild_id
        .set_application_commands(&ctx.http, |commands| {
            commands
                .create_application_command(suggest::register)
                .create_application_command(vote::register)
                .create_application_command(select::register)
                .create_application_command(db::register)
        })
        .await?;
    Ok(())
}

/// Single catch point for the whole command surface: every handler error is
/// logged and reported back as an ephemeral embed. Nothing is retried and
/// nothing takes the process down.
pub async fn handle(ctx: &Context, command: ApplicationCommandInteraction) {
    let result = match command.data.name.as_str() {
        "suggest" => suggest::run(ctx, &command).await,
        "vote" => vote::run(ctx, &command).await,
        "select" => select::run(ctx, &command).await,
        "db" => db::run(ctx, &command).await,
        other => {
            warn!("received unknown command /{}", other);
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("/{} failed: {}", command.data.name, err);
        let (title, description) = failure_notice(&err);
        if respond_embed(ctx, &command, title, &description).await.is_err() {
            // the handler already responded before failing
            if let Err(err) = followup_embed(ctx, &command, title, &description).await {
                error!("could not report /{} failure: {}", command.data.name, err);
            }
        }
    }
}

fn failure_notice(err: &BotError) -> (&'static str, String) {
    let title = match err {
        BotError::Storage(_) => "Database Error",
        BotError::InvalidQuery(_) => "Invalid Query Type",
        BotError::InsufficientCandidates => "No Suggestions Available",
        BotError::RoundNotFound => "Voting Message Not Found",
        BotError::NoVotes => "No Votes Cast",
        BotError::RoundResolved => "Round Already Resolved",
        BotError::PermissionDenied => "Permission Denied",
        BotError::Discord(_) => "Discord Error",
    };
    (title, err.to_string())
}

pub fn ensure_admin(command: &ApplicationCommandInteraction) -> Result<(), BotError> {
    let is_admin = command
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .map_or(false, |permissions| permissions.administrator());
    if is_admin {
        Ok(())
    } else {
        Err(BotError::PermissionDenied)
    }
}

pub async fn respond_embed(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    title: &str,
    description: &str,
) -> Result<(), serenity::Error> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|data| {
                    data.ephemeral(true).embed(|embed| {
                        embed.title(title);
                        embed.description(description);
                        embed.colour(EMBED_COLOUR);
                        embed.footer(|footer| footer.text(FOOTER))
                    })
                })
        })
        .await
}

async fn followup_embed(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    title: &str,
    description: &str,
) -> Result<(), serenity::Error> {
    command
        .create_followup_message(&ctx.http, |message| {
            message.ephemeral(true).embed(|embed| {
                embed.title(title);
                embed.description(description);
                embed.colour(EMBED_COLOUR);
                embed.footer(|footer| footer.text(FOOTER))
            })
        })
        .await?;
    Ok(())
}

pub async fn announce_embed(
    ctx: &Context,
    channel: ChannelId,
    title: &str,
    description: &str,
) -> Result<(), serenity::Error> {
    channel
        .send_message(&ctx.http, |message| {
            message.embed(|embed| {
                embed.title(title);
                embed.description(description);
                embed.colour(EMBED_COLOUR);
                embed.footer(|footer| footer.text(FOOTER))
            })
        })
        .await?;
    Ok(())
}
