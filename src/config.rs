//! Client configuration. Everything has a workable default except the
//! bot identity; [`ClientOptions::check`] runs before connecting and a
//! failure there is fatal.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rate_limit::BotTier;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Bot account username.
    pub username: String,

    /// OAuth password, without the `oauth:` scheme.
    pub oauth: String,

    /// Command prefix.
    pub prefix: String,

    /// Channels joined at startup.
    pub channels: Vec<String>,

    /// Usernames passing the `regular` userlevel gate. An empty list
    /// disables that gate entirely.
    pub bot_owners: Vec<String>,

    /// Whether the bot joins its own channel at startup.
    pub auto_join_bot_channel: bool,

    /// Send `on_join_message` when the bot joins a channel.
    pub greet_on_join: bool,
    pub on_join_message: String,

    /// Classification used for message-limit control.
    pub bot_tier: BotTier,

    /// Rate-limiting toggle; leave on unless the budget is enforced
    /// elsewhere.
    pub enable_rate_limiting_control: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            username: String::new(),
            oauth: String::new(),
            prefix: "!".to_string(),
            channels: Vec::new(),
            bot_owners: Vec::new(),
            auto_join_bot_channel: false,
            greet_on_join: false,
            on_join_message: String::new(),
            bot_tier: BotTier::Normal,
            enable_rate_limiting_control: true,
        }
    }
}

impl ClientOptions {
    pub fn new(username: &str, oauth: &str) -> Self {
        Self {
            username: username.to_string(),
            oauth: oauth.to_string(),
            ..Default::default()
        }
    }

    /// Startup validation: a bad identity or a reserved prefix must stop
    /// the process before it connects.
    pub fn check(&self) -> Result<(), Error> {
        if self.prefix == "/" {
            return Err(Error::Config("Invalid prefix. Cannot be /".to_string()));
        }
        if self.username.is_empty() {
            return Err(Error::Config("Username not specified".to_string()));
        }
        if self.oauth.is_empty() {
            return Err(Error::Config("Oauth password not specified".to_string()));
        }
        Ok(())
    }
}
