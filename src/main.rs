pub mod commands;
pub mod database;
pub mod error;
pub mod events;
pub mod extensions;
pub mod models;
pub mod voting;

#[macro_use]
extern crate tracing;

use std::{env, sync::Arc, time::Duration};

use clokwerk::AsyncScheduler;
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;

use crate::database::Database;
use crate::voting::registry::{RoundRegistry, Rounds};

struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected as {}", ready.user.tag());

        let guild_id = GuildId(
            env::var("GUILD_ID")
                .expect("Expected GUILD_ID in the environment")
                .parse()
                .expect("Invalid GUILD_ID provided"),
        );
        match commands::register_all(&ctx, guild_id).await {
            Ok(_) => info!("application commands registered for guild {}", guild_id.0),
            Err(err) => error!("failed to register application commands: {}", err),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            commands::handle(&ctx, command).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    info!("starting movie-night-bot ({})", env!("GIT_HASH"));

    let token = env::var("DISCORD_TOKEN").expect("Expected DISCORD_TOKEN in the environment");
    let application_id: u64 = env::var("APPLICATION_ID")
        .expect("Expected APPLICATION_ID in the environment")
        .parse()
        .expect("Invalid APPLICATION_ID provided");
    let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "suggestions.db".to_string());

    let db = Arc::new(Database::open(&database_path).await?);
    let rounds = Arc::new(RoundRegistry::new());

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS;
    let mut client = Client::builder(&token, intents)
        .event_handler(Handler)
        .application_id(application_id)
        .await?;
    {
        let mut data = client.data.write().await;
        data.insert::<Database>(db.clone());
        data.insert::<Rounds>(rounds.clone());
    }

    let timezone: chrono_tz::Tz = env::var("TIMEZONE")
        .unwrap_or_else(|_| "America/New_York".to_string())
        .parse()
        .expect("Invalid TIMEZONE provided");
    let announce_at = env::var("ANNOUNCE_TIME").unwrap_or_else(|_| "17:00".to_string());
    let channel_id: u64 = env::var("MOVIE_CHANNEL_ID")
        .expect("Expected MOVIE_CHANNEL_ID in the environment")
        .parse()
        .expect("Invalid MOVIE_CHANNEL_ID provided");

    let mut scheduler = AsyncScheduler::with_tz(timezone);
    events::setup_schedulers(
        &mut scheduler,
        client.cache_and_http.http.clone(),
        db,
        rounds,
        channel_id,
        &announce_at,
    );
    tokio::spawn(async move {
        loop {
            scheduler.run_pending().await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Could not register ctrl+c handler");
        shard_manager.lock().await.shutdown_all().await;
    });

    client.start().await?;
    Ok(())
}
