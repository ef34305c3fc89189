use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;

use crate::commands::respond_embed;
use crate::error::BotError;
use crate::extensions::*;

pub fn register(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("suggest")
        .description("Suggest a movie")
        .create_option(|option| {
            option
                .name("movie")
                .description("Name of the movie")
                .kind(CommandOptionType::String)
                .required(true)
        })
}

pub async fn run(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), BotError> {
    let title = command
        .data
        .options
        .by_name("movie")
        .and_then(|option| option.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();
    if title.is_empty() {
        respond_embed(ctx, command, "Invalid Suggestion", "Movie name cannot be empty.").await?;
        return Ok(());
    }

    let db = ctx.get_db().await;
    let row = db.add_or_increment(&title).await?;
    info!("suggestion for {:?} recorded by {}", row.title, command.user.tag());

    let (notice_title, notice) = if row.suggestion_count > 1 {
        (
            "Movie Suggestion Updated",
            format!("{} now has {} suggestions", row.title, row.suggestion_count),
        )
    } else {
        (
            "Movie Suggestion Received",
            format!("Movie suggestion received: {}", row.title),
        )
    };
    respond_embed(ctx, command, notice_title, &notice).await?;
    Ok(())
}
