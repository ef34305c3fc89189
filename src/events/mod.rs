pub mod round_announcer;

use std::sync::Arc;

use clokwerk::{AsyncScheduler, Job, TimeUnits};
use serenity::http::Http;
use serenity::model::id::ChannelId;

use crate::database::Database;
use crate::voting::registry::RoundRegistry;

pub fn setup_schedulers(
    scheduler: &mut AsyncScheduler<chrono_tz::Tz>,
    http: Arc<Http>,
    db: Arc<Database>,
    rounds: Arc<RoundRegistry>,
    channel_id: u64,
    announce_at: &str,
) {
    scheduler.every(1.day()).at(announce_at).run(move || {
        let http = http.clone();
        let db = db.clone();
        let rounds = rounds.clone();
        async move {
            if let Err(err) =
                round_announcer::start_round(&http, &db, &rounds, ChannelId(channel_id)).await
            {
                error!("scheduled round announcement failed: {}", err);
            }
        }
    });
}
