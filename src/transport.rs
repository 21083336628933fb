//! Boundary to the chat transport. Connecting, reconnection, and
//! protocol framing live behind this trait; the engine only consumes
//! its event stream and issues sends.

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{Chatter, DeliveryKind};

/// Delivery acknowledgment identifier returned by the transport for a
/// completed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendAck(pub String);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn say(&self, channel: &str, message: &str) -> Result<SendAck, Error>;
    async fn action(&self, channel: &str, message: &str) -> Result<SendAck, Error>;
    async fn whisper(&self, user: &str, message: &str) -> Result<SendAck, Error>;
    async fn join(&self, channel: &str) -> Result<(), Error>;
    async fn part(&self, channel: &str) -> Result<(), Error>;
    fn username(&self) -> String;
    fn joined_channels(&self) -> Vec<String>;
}

/// Everything the transport reports back to the engine.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    Reconnecting,
    Joined {
        channel: String,
        who: String,
    },
    Timeout {
        channel: String,
        who: String,
        reason: String,
        duration_seconds: u64,
    },
    ModGranted {
        channel: String,
        who: String,
    },
    ModRevoked {
        channel: String,
        who: String,
    },
    Message {
        channel: String,
        author: Chatter,
        text: String,
        kind: DeliveryKind,
        is_self: bool,
    },
}
