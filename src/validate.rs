//! Per-command access control. The decision sequence is ordered; the
//! first applicable rule wins and each denial carries a complete reply
//! string sent back to the caller as-is.

use crate::models::{ChatMessage, CommandOptions, UserLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(String),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }
}

pub fn pre_validate(
    options: &CommandOptions,
    msg: &ChatMessage,
    bot_username: &str,
    bot_owners: &[String],
) -> Verdict {
    if !msg.is_whisper() && options.privmsg_only {
        return Verdict::Denied(
            "This command is only available as a private message to the bot".to_string(),
        );
    }

    if options.bot_channel_only && msg.channel.name.trim_start_matches('#') != bot_username {
        return Verdict::Denied(format!(
            "This command can only be used in the bot channel. Go to https://twitch.tv/{}",
            bot_username
        ));
    }

    if options.userlevel == UserLevel::Everyone {
        return Verdict::Allowed;
    }

    let elevated = msg.author.is_elevated();

    if options.userlevel == UserLevel::Regular {
        // An empty owner list disables this gate entirely.
        if !elevated
            && !bot_owners.is_empty()
            && !bot_owners.iter().any(|o| *o == msg.author.username)
        {
            return Verdict::Denied(
                "This command is only available to approved users".to_string(),
            );
        }
    }

    if options.userlevel == UserLevel::Subscriber && !elevated && !msg.author.is_subscriber {
        return Verdict::Denied("This command is only available to subscribers".to_string());
    }

    if options.userlevel == UserLevel::Vip && !elevated && !msg.author.is_vip {
        return Verdict::Denied("This command is only available to VIPs".to_string());
    }

    if options.userlevel == UserLevel::Moderator && !elevated {
        return Verdict::Denied(
            "This command is only available to moderators or the broadcaster".to_string(),
        );
    }

    if options.userlevel == UserLevel::Broadcaster && !msg.author.is_broadcaster {
        return Verdict::Denied(
            "This command is only available to the broadcaster".to_string(),
        );
    }

    Verdict::Allowed
}
