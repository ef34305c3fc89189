use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;

use crate::commands::{ensure_admin, respond_embed};
use crate::database::QueryOutcome;
use crate::error::BotError;
use crate::extensions::*;

// embed descriptions cap out at 4096
const MAX_BLOCK: usize = 4000;

pub fn register(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("db")
        .description("Admin command to interact with the suggestion database")
        .create_option(|option| {
            option
                .name("action")
                .description("The action to run")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("List Movies", "list")
                .add_string_choice("Delete Movies", "delete")
                .add_string_choice("Manual Query", "manual")
        })
        .create_option(|option| {
            option
                .name("query")
                .description("The SQL query to run (for manual action)")
                .kind(CommandOptionType::String)
                .required(false)
        })
}

pub async fn run(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), BotError> {
    ensure_admin(command)?;

    let action = command
        .data
        .options
        .by_name("action")
        .and_then(|option| option.as_str())
        .unwrap_or_default();
    let db = ctx.get_db().await;

    match action {
        "list" => {
            let rows = db.list_all().await?;
            let listing = if rows.is_empty() {
                "No movies in the database.".to_string()
            } else {
                rows.iter()
                    .map(|row| {
                        format!(
                            "Movie: {}, Suggestions: {}, Date won: {}",
                            row.title,
                            row.suggestion_count,
                            row.date_won
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "N/A".to_string())
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            respond_embed(ctx, command, "Movie List", &code_block(&listing)).await?;
        }
        "delete" => {
            let deleted = db.delete_all().await?;
            warn!("/db delete wiped {} suggestions", deleted);
            respond_embed(
                ctx,
                command,
                "Movies Deleted",
                &format!("Successfully deleted all movies ({} rows).", deleted),
            )
            .await?;
        }
        "manual" => {
            let Some(query) = command
                .data
                .options
                .by_name("query")
                .and_then(|option| option.as_str())
            else {
                respond_embed(
                    ctx,
                    command,
                    "Invalid Query",
                    "You must provide a query for the manual action.",
                )
                .await?;
                return Ok(());
            };
            match db.run_raw_query(query).await? {
                QueryOutcome::Rows(lines) => {
                    respond_embed(ctx, command, "Query Result", &code_block(&lines.join("\n")))
                        .await?;
                }
                QueryOutcome::Affected(count) => {
                    respond_embed(
                        ctx,
                        command,
                        "Query Execution Success",
                        &format!("Query executed, {} rows affected.", count),
                    )
                    .await?;
                }
            }
        }
        other => {
            respond_embed(
                ctx,
                command,
                "Invalid Action",
                &format!("Invalid action selected: {}", other),
            )
            .await?;
        }
    }
    Ok(())
}

fn code_block(text: &str) -> String {
    let mut text = text.to_string();
    if text.len() > MAX_BLOCK {
        let mut cut = MAX_BLOCK;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n...");
    }
    format!("```{}```", text)
}
