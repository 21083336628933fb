use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a message arrived as a channel broadcast or a private whisper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    Chat,
    Whisper,
}

/// Chat user state as delivered by the transport for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chatter {
    pub username: String,
    pub display_name: String,
    pub is_broadcaster: bool,
    pub is_moderator: bool,
    pub is_subscriber: bool,
    pub is_vip: bool,
}

impl Chatter {
    pub fn named(username: &str) -> Self {
        Self {
            username: username.to_string(),
            display_name: username.to_string(),
            is_broadcaster: false,
            is_moderator: false,
            is_subscriber: false,
            is_vip: false,
        }
    }

    /// Broadcaster or moderator status short-circuits most userlevel gates.
    pub fn is_elevated(&self) -> bool {
        self.is_broadcaster || self.is_moderator
    }
}

/// The channel a message was sent in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChannel {
    pub name: String,
    pub room_id: Option<String>,
}

impl ChatChannel {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            room_id: None,
        }
    }
}

/// One inbound chat message, as handed to the dispatch pipeline.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub channel: ChatChannel,
    pub author: Chatter,
    pub text: String,
    pub kind: DeliveryKind,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(channel: &str, author: Chatter, text: &str, kind: DeliveryKind) -> Self {
        Self {
            channel: ChatChannel::named(channel),
            author,
            text: text.to_string(),
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn is_whisper(&self) -> bool {
        self.kind == DeliveryKind::Whisper
    }
}
