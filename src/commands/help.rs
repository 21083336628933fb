//! `!commands` (alias `!help`): list the registered commands, or show
//! one command's description and usage examples.

use async_trait::async_trait;

use crate::args::NamedParams;
use crate::commands::{CommandContext, CommandHandler};
use crate::error::Error;
use crate::models::{ArgKind, ArgSpec, ChatMessage, CommandOptions};

pub struct HelpCommand;

impl HelpCommand {
    pub fn options(prefix: &str) -> CommandOptions {
        CommandOptions {
            name: "commands".to_string(),
            aliases: vec!["help".to_string()],
            description: format!(
                "This command shows the list of all commands. Send {}help <command> for details about one command.",
                prefix
            ),
            examples: vec![
                format!("{}commands", prefix),
                format!("{}help <command>", prefix),
            ],
            args: vec![ArgSpec::new("command", ArgKind::String)],
            ..Default::default()
        }
    }

    async fn command_list(&self, ctx: &CommandContext, msg: &ChatMessage) -> Result<(), Error> {
        let names: Vec<String> = ctx
            .registry
            .list()
            .iter()
            .filter(|options| !options.hide_from_help)
            .map(|options| format!("{}{}", ctx.prefix, options.name))
            .collect();

        ctx.sender
            .reply(msg, &format!("Command list → {}", names.join(", ")))
            .await?;
        Ok(())
    }

    async fn command_help(
        &self,
        ctx: &CommandContext,
        msg: &ChatMessage,
        command: &str,
    ) -> Result<(), Error> {
        let found = ctx
            .registry
            .get(command)
            .filter(|options| !options.hide_from_help);

        match found {
            Some(options) => {
                let mut text = options.description.clone();
                if !options.examples.is_empty() {
                    text += &format!(", Usage: {}", options.examples.join(", "));
                }
                ctx.sender.reply(msg, &text).await?;
            }
            None => {
                ctx.sender
                    .reply(msg, &format!("command '{}' not found", command))
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(
        &self,
        ctx: CommandContext,
        msg: ChatMessage,
        params: NamedParams,
    ) -> Result<Option<String>, Error> {
        let requested = params
            .get("command")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        match requested {
            Some(command) => self.command_help(&ctx, &msg, &command).await?,
            None => self.command_list(&ctx, &msg).await?,
        }
        Ok(None)
    }
}
