use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::transport::{ChatTransport, SendAck};

/// Everything a test transport was asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Say { channel: String, text: String },
    Action { channel: String, text: String },
    Whisper { user: String, text: String },
    Join { channel: String },
    Part { channel: String },
}

/// In-memory transport that records outbound traffic instead of
/// talking to a chat server.
pub struct RecordingTransport {
    username: String,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Texts of all `say` sends, in order.
    pub fn said(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Say { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, entry: Sent) -> SendAck {
        self.sent.lock().unwrap().push(entry);
        SendAck(Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn say(&self, channel: &str, message: &str) -> Result<SendAck, Error> {
        Ok(self.record(Sent::Say {
            channel: channel.to_string(),
            text: message.to_string(),
        }))
    }

    async fn action(&self, channel: &str, message: &str) -> Result<SendAck, Error> {
        Ok(self.record(Sent::Action {
            channel: channel.to_string(),
            text: message.to_string(),
        }))
    }

    async fn whisper(&self, user: &str, message: &str) -> Result<SendAck, Error> {
        Ok(self.record(Sent::Whisper {
            user: user.to_string(),
            text: message.to_string(),
        }))
    }

    async fn join(&self, channel: &str) -> Result<(), Error> {
        self.record(Sent::Join {
            channel: channel.to_string(),
        });
        Ok(())
    }

    async fn part(&self, channel: &str) -> Result<(), Error> {
        self.record(Sent::Part {
            channel: channel.to_string(),
        });
        Ok(())
    }

    fn username(&self) -> String {
        self.username.clone()
    }

    fn joined_channels(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Join { channel } => Some(channel),
                _ => None,
            })
            .collect()
    }
}
