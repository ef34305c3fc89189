use std::sync::Arc;

use serenity::async_trait;
use serenity::model::application::interaction::application_command::{
    CommandDataOption, CommandDataOptionValue,
};
use serenity::prelude::Context;

use crate::database::Database;
use crate::voting::registry::{RoundRegistry, Rounds};

#[async_trait]
pub trait ClientContextExt {
    async fn get_db(&self) -> Arc<Database>;
    async fn get_rounds(&self) -> Arc<RoundRegistry>;
}

#[async_trait]
impl ClientContextExt for Context {
    async fn get_db(&self) -> Arc<Database> {
        self.data.read().await.get::<Database>().unwrap().clone()
    }

    async fn get_rounds(&self) -> Arc<RoundRegistry> {
        self.data.read().await.get::<Rounds>().unwrap().clone()
    }
}

pub trait CommandDataOptionExt {
    fn as_str(&self) -> Option<&str>;
}

impl CommandDataOptionExt for CommandDataOption {
    fn as_str(&self) -> Option<&str> {
        match self.resolved.as_ref()? {
            CommandDataOptionValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

pub trait CommandDataOptionVecExt {
    fn by_name(&self, name: &str) -> Option<&CommandDataOption>;
}

impl CommandDataOptionVecExt for [CommandDataOption] {
    fn by_name(&self, name: &str) -> Option<&CommandDataOption> {
        self.iter().find(|option| option.name == name)
    }
}
