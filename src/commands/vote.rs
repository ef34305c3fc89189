use serenity::builder::CreateApplicationCommand;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;

use crate::commands::{ensure_admin, respond_embed};
use crate::error::BotError;
use crate::events::round_announcer;
use crate::extensions::*;

pub fn register(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("vote")
        .description("Starts the voting process for selecting a movie")
}

pub async fn run(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), BotError> {
    ensure_admin(command)?;

    let db = ctx.get_db().await;
    let rounds = ctx.get_rounds().await;
    round_announcer::start_round(&ctx.http, &db, &rounds, command.channel_id).await?;

    respond_embed(ctx, command, "Voting Started", "Voting has started!").await?;
    Ok(())
}
