//! The handler behind every dynamically created text command: deliver
//! the descriptor's fixed text per its configured response type.

use async_trait::async_trait;

use crate::args::NamedParams;
use crate::commands::{CommandContext, CommandHandler};
use crate::error::Error;
use crate::models::ChatMessage;

pub struct TextCommand;

#[async_trait]
impl CommandHandler for TextCommand {
    async fn run(
        &self,
        ctx: CommandContext,
        msg: ChatMessage,
        _params: NamedParams,
    ) -> Result<Option<String>, Error> {
        let text = ctx.options.text.clone().unwrap_or_default();
        ctx.sender.respond(&msg, ctx.options.message_type, &text).await?;
        Ok(Some(text))
    }
}
