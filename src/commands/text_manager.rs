//! `!txt`: in-chat management of text commands.
//!
//! `txt set <name> <text...>`, `txt get <name>`, `txt unset <name>`,
//! `txt access <name> <userlevel>`, `txt type <name> <messageType>`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::args::NamedParams;
use crate::commands::{CommandContext, CommandHandler};
use crate::error::Error;
use crate::models::{
    ChatMessage, CommandOptions, CommandPatch, ResponseType, UserLevel,
};
use crate::store::TextCommandStore;

pub struct TextCommandsManager {
    store: Option<Arc<TextCommandStore>>,
}

impl TextCommandsManager {
    pub fn new(store: Option<Arc<TextCommandStore>>) -> Self {
        Self { store }
    }

    pub fn options() -> CommandOptions {
        CommandOptions {
            name: "txt".to_string(),
            userlevel: UserLevel::Regular,
            description: "Manage text commands: set, get, unset, access, type".to_string(),
            ..Default::default()
        }
    }

    async fn set(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        store: &TextCommandStore,
        name: &str,
        text: &str,
    ) -> Result<(), Error> {
        if text.is_empty() {
            ctx.sender.reply(msg, "Text argument required").await?;
            return Ok(());
        }

        let record = store.set(name, text)?;
        ctx.sender
            .reply(
                msg,
                &format!("Command created → {}{} — {}", ctx.prefix, record.name, record.text),
            )
            .await?;
        Ok(())
    }

    async fn get(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        store: &TextCommandStore,
        name: &str,
    ) -> Result<(), Error> {
        match store.get(name) {
            Some(record) => {
                ctx.sender
                    .reply(
                        msg,
                        &format!(
                            "Options → text: {}, userlevel: {}, messageType: {}",
                            record.text, record.userlevel, record.message_type
                        ),
                    )
                    .await?;
            }
            None => {
                ctx.sender
                    .reply(msg, &format!("Command '{}' is not found", name))
                    .await?;
            }
        }
        Ok(())
    }

    async fn unset(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        store: &TextCommandStore,
        name: &str,
    ) -> Result<(), Error> {
        if store.unset(name)? {
            ctx.sender
                .reply(msg, &format!("Command '{}' deleted", name))
                .await?;
        } else {
            ctx.sender
                .reply(msg, &format!("Command '{}' is not found", name))
                .await?;
        }
        Ok(())
    }

    async fn update_userlevel(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        store: &TextCommandStore,
        name: &str,
        level: &str,
    ) -> Result<(), Error> {
        match level.parse::<UserLevel>() {
            Ok(level) => {
                let patch = CommandPatch {
                    userlevel: Some(level),
                    ..Default::default()
                };
                self.apply(ctx, msg, store, name, &patch).await
            }
            Err(_) => {
                let valid: Vec<&str> = UserLevel::ALL.iter().map(|l| l.as_str()).collect();
                ctx.sender
                    .reply(msg, &format!("Available userlevels: {}", valid.join(", ")))
                    .await?;
                Ok(())
            }
        }
    }

    async fn update_message_type(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        store: &TextCommandStore,
        name: &str,
        kind: &str,
    ) -> Result<(), Error> {
        match kind.parse::<ResponseType>() {
            Ok(kind) => {
                let patch = CommandPatch {
                    message_type: Some(kind),
                    ..Default::default()
                };
                self.apply(ctx, msg, store, name, &patch).await
            }
            Err(_) => {
                let valid: Vec<&str> = ResponseType::ALL.iter().map(|k| k.as_str()).collect();
                ctx.sender
                    .reply(msg, &format!("Available message types: {}", valid.join(", ")))
                    .await?;
                Ok(())
            }
        }
    }

    async fn apply(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        store: &TextCommandStore,
        name: &str,
        patch: &CommandPatch,
    ) -> Result<(), Error> {
        if store.apply_patch(name, patch)? {
            ctx.sender
                .reply(msg, &format!("Command '{}' updated!", name))
                .await?;
        } else {
            ctx.sender
                .reply(msg, &format!("Command '{}' is not found", name))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for TextCommandsManager {
    async fn run(
        &self,
        ctx: CommandContext,
        msg: ChatMessage,
        _params: NamedParams,
    ) -> Result<Option<String>, Error> {
        let store = match &self.store {
            Some(store) => Arc::clone(store),
            None => {
                ctx.sender
                    .reply(&msg, "Text command store is not registered!")
                    .await?;
                return Ok(None);
            }
        };

        // Raw positional grammar, not schema-bound: the text tail may be
        // arbitrarily long.
        let args = &ctx.invocation.args;
        if args.len() > 1 {
            let action = args[0].as_str();
            let name = args[1].as_str();
            let opts = args[2..].join(" ");

            match action {
                "set" => self.set(&ctx, &msg, &store, name, &opts).await?,
                "get" => self.get(&ctx, &msg, &store, name).await?,
                "unset" => self.unset(&ctx, &msg, &store, name).await?,
                "access" => self.update_userlevel(&ctx, &msg, &store, name, &opts).await?,
                "type" => self.update_message_type(&ctx, &msg, &store, name, &opts).await?,
                other => {
                    ctx.sender
                        .reply(&msg, &format!("Action '{}' is not found!", other))
                        .await?;
                }
            }
        } else {
            ctx.sender
                .reply(&msg, "Manage command is not enough arguments")
                .await?;
        }

        Ok(None)
    }
}
