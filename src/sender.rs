//! Rate-gated send primitives. Channel broadcasts consume the shared
//! send budget; whispers go straight to the transport.

use std::sync::Arc;

use tracing::warn;

use crate::error::Error;
use crate::models::{ChatMessage, ResponseType};
use crate::rate_limit::RateLimiter;
use crate::transport::{ChatTransport, SendAck};

pub struct MessageSender {
    transport: Arc<dyn ChatTransport>,
    rate: Arc<RateLimiter>,
}

impl MessageSender {
    pub fn new(transport: Arc<dyn ChatTransport>, rate: Arc<RateLimiter>) -> Self {
        Self { transport, rate }
    }

    /// Send a text message in the channel. Returns `None` when the send
    /// budget is exhausted and the message was dropped.
    pub async fn say(&self, channel: &str, message: &str) -> Result<Option<SendAck>, Error> {
        if !self.rate.try_consume() {
            warn!(channel, "rate limit exceeded; dropping message");
            return Ok(None);
        }
        let ack = self.transport.say(channel, message).await?;
        self.rate.on_sent();
        Ok(Some(ack))
    }

    /// Send an action (`/me`) message in the channel.
    pub async fn action(&self, channel: &str, message: &str) -> Result<Option<SendAck>, Error> {
        if !self.rate.try_consume() {
            warn!(channel, "rate limit exceeded; dropping action");
            return Ok(None);
        }
        let ack = self.transport.action(channel, message).await?;
        self.rate.on_sent();
        Ok(Some(ack))
    }

    pub async fn whisper(&self, user: &str, message: &str) -> Result<Option<SendAck>, Error> {
        let ack = self.transport.whisper(user, message).await?;
        Ok(Some(ack))
    }

    /// Reply to a message: `@author, <text>` in the channel, or a
    /// whisper back when the message arrived as one.
    pub async fn reply(&self, msg: &ChatMessage, text: &str) -> Result<Option<SendAck>, Error> {
        if msg.is_whisper() {
            self.whisper(&msg.author.username, text).await
        } else {
            let mention = format!("@{}, {}", msg.author.display_name, text);
            self.say(&msg.channel.name, &mention).await
        }
    }

    pub async fn action_reply(&self, msg: &ChatMessage, text: &str) -> Result<Option<SendAck>, Error> {
        let mention = format!("@{}, {}", msg.author.display_name, text);
        self.action(&msg.channel.name, &mention).await
    }

    /// Deliver `text` per a text command's configured response type.
    pub async fn respond(
        &self,
        msg: &ChatMessage,
        kind: ResponseType,
        text: &str,
    ) -> Result<Option<SendAck>, Error> {
        match kind {
            ResponseType::Reply => self.reply(msg, text).await,
            ResponseType::ActionReply => self.action_reply(msg, text).await,
            ResponseType::Say => self.say(&msg.channel.name, text).await,
            ResponseType::ActionSay => self.action(&msg.channel.name, text).await,
        }
    }
}
