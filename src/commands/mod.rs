//! Command handlers: the trait seam the dispatcher invokes through,
//! plus the built-ins (help listing, text-command replies, and the
//! in-chat text-command manager).

pub mod help;
pub mod text_command;
pub mod text_manager;

use std::sync::Arc;

use async_trait::async_trait;

use crate::args::NamedParams;
use crate::error::Error;
use crate::models::{ChatMessage, CommandOptions};
use crate::parser::Invocation;
use crate::registry::CommandRegistry;
use crate::sender::MessageSender;

/// Per-invocation context handed to a handler.
#[derive(Clone)]
pub struct CommandContext {
    /// The matched descriptor, as it was at dispatch time.
    pub options: CommandOptions,
    pub invocation: Invocation,
    pub sender: Arc<MessageSender>,
    pub registry: Arc<CommandRegistry>,
    pub prefix: String,
}

/// A command implementation. Handlers reply through `ctx.sender` and
/// may return a result string carried on the `CommandExecuted` event.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(
        &self,
        ctx: CommandContext,
        msg: ChatMessage,
        params: NamedParams,
    ) -> Result<Option<String>, Error>;
}
