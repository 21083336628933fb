use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access tier required to run a command, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    Everyone,
    Regular,
    Subscriber,
    Vip,
    Moderator,
    Broadcaster,
}

impl UserLevel {
    pub const ALL: [UserLevel; 6] = [
        UserLevel::Everyone,
        UserLevel::Regular,
        UserLevel::Subscriber,
        UserLevel::Vip,
        UserLevel::Moderator,
        UserLevel::Broadcaster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Everyone => "everyone",
            UserLevel::Regular => "regular",
            UserLevel::Subscriber => "subscriber",
            UserLevel::Vip => "vip",
            UserLevel::Moderator => "moderator",
            UserLevel::Broadcaster => "broadcaster",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "everyone" => Ok(UserLevel::Everyone),
            "regular" => Ok(UserLevel::Regular),
            "subscriber" => Ok(UserLevel::Subscriber),
            "vip" => Ok(UserLevel::Vip),
            "moderator" => Ok(UserLevel::Moderator),
            "broadcaster" => Ok(UserLevel::Broadcaster),
            other => Err(format!("unknown userlevel '{}'", other)),
        }
    }
}

/// How a trivial text command delivers its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseType {
    Reply,
    ActionReply,
    Say,
    ActionSay,
}

impl ResponseType {
    pub const ALL: [ResponseType; 4] = [
        ResponseType::Reply,
        ResponseType::ActionReply,
        ResponseType::Say,
        ResponseType::ActionSay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Reply => "reply",
            ResponseType::ActionReply => "actionReply",
            ResponseType::Say => "say",
            ResponseType::ActionSay => "actionSay",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reply" => Ok(ResponseType::Reply),
            "actionReply" => Ok(ResponseType::ActionReply),
            "say" => Ok(ResponseType::Say),
            "actionSay" => Ok(ResponseType::ActionSay),
            other => Err(format!("unknown message type '{}'", other)),
        }
    }
}

/// Declared coercion for one positional argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    #[default]
    String,
    Number,
    Boolean,
}

impl ArgKind {
    /// Coerce a raw non-empty token into a typed value. Numeric parse
    /// falls back to NaN rather than failing the whole bind; boolean
    /// accepts "false"/"0" as false and any other token as true.
    pub fn coerce(&self, token: &str) -> ArgValue {
        match self {
            ArgKind::String => ArgValue::Str(token.to_string()),
            ArgKind::Number => ArgValue::Num(token.parse::<f64>().unwrap_or(f64::NAN)),
            ArgKind::Boolean => {
                let lowered = token.to_lowercase();
                ArgValue::Bool(lowered != "false" && lowered != "0")
            }
        }
    }
}

/// A typed parameter value produced by the argument binder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            ArgValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }
}

/// One entry of a command's ordered argument schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgSpec {
    pub name: String,
    #[serde(default)]
    pub kind: ArgKind,
    #[serde(default)]
    pub default_value: Option<ArgValue>,
}

impl ArgSpec {
    pub fn new(name: &str, kind: ArgKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: ArgValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Static definition of a command: identity, access rule, argument
/// schema, flags and help text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandOptions {
    pub name: String,
    pub aliases: Vec<String>,
    pub userlevel: UserLevel,
    pub description: String,
    pub examples: Vec<String>,
    pub args: Vec<ArgSpec>,

    /// Fixed reply body for trivial text commands.
    pub text: Option<String>,
    /// Delivery mode used by trivial text commands.
    pub message_type: ResponseType,

    pub bot_channel_only: bool,
    pub privmsg_only: bool,
    pub hide_from_help: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            aliases: Vec::new(),
            userlevel: UserLevel::Everyone,
            description: String::new(),
            examples: Vec::new(),
            args: Vec::new(),
            text: None,
            message_type: ResponseType::Reply,
            bot_channel_only: false,
            privmsg_only: false,
            hide_from_help: false,
        }
    }
}

impl CommandOptions {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Partial-fields update merged into a descriptor without replacing its
/// identity. Used by both the in-chat manager and the REST boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandPatch {
    pub text: Option<String>,
    pub userlevel: Option<UserLevel>,
    pub message_type: Option<ResponseType>,
    pub description: Option<String>,
    pub examples: Option<Vec<String>>,
    pub bot_channel_only: Option<bool>,
    pub privmsg_only: Option<bool>,
    pub hide_from_help: Option<bool>,
}

impl CommandPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.userlevel.is_none()
            && self.message_type.is_none()
            && self.description.is_none()
            && self.examples.is_none()
            && self.bot_channel_only.is_none()
            && self.privmsg_only.is_none()
            && self.hide_from_help.is_none()
    }

    pub fn apply(&self, options: &mut CommandOptions) {
        if let Some(text) = &self.text {
            options.text = Some(text.clone());
        }
        if let Some(level) = self.userlevel {
            options.userlevel = level;
        }
        if let Some(kind) = self.message_type {
            options.message_type = kind;
        }
        if let Some(description) = &self.description {
            options.description = description.clone();
        }
        if let Some(examples) = &self.examples {
            options.examples = examples.clone();
        }
        if let Some(flag) = self.bot_channel_only {
            options.bot_channel_only = flag;
        }
        if let Some(flag) = self.privmsg_only {
            options.privmsg_only = flag;
        }
        if let Some(flag) = self.hide_from_help {
            options.hide_from_help = flag;
        }
    }
}

/// Persisted record of a dynamically created text command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCommandRecord {
    pub name: String,
    pub text: String,
    pub userlevel: UserLevel,
    pub message_type: ResponseType,
}

impl TextCommandRecord {
    /// The live descriptor mirrored into the registry for this record.
    pub fn to_options(&self) -> CommandOptions {
        CommandOptions {
            name: self.name.clone(),
            userlevel: self.userlevel,
            text: Some(self.text.clone()),
            message_type: self.message_type,
            hide_from_help: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn userlevel_round_trips_through_serde() {
        let level: UserLevel = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(level, UserLevel::Moderator);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"moderator\"");
    }

    #[test]
    fn response_type_uses_camel_case_wire_names() {
        let kind: ResponseType = serde_json::from_str("\"actionReply\"").unwrap();
        assert_eq!(kind, ResponseType::ActionReply);
        assert!("actionsay".parse::<ResponseType>().is_err());
        assert_eq!("actionSay".parse::<ResponseType>().unwrap(), ResponseType::ActionSay);
    }

    #[test]
    fn patch_merges_without_touching_identity() {
        let mut options = CommandOptions::named("greet");
        options.aliases = vec!["hi".to_string()];

        let patch = CommandPatch {
            userlevel: Some(UserLevel::Vip),
            text: Some("hello there".to_string()),
            ..Default::default()
        };
        patch.apply(&mut options);

        assert_eq!(options.name, "greet");
        assert_eq!(options.aliases, vec!["hi".to_string()]);
        assert_eq!(options.userlevel, UserLevel::Vip);
        assert_eq!(options.text.as_deref(), Some("hello there"));
        assert_eq!(options.message_type, ResponseType::Reply);
    }

    #[test]
    fn number_coercion_falls_back_to_nan() {
        assert_eq!(ArgKind::Number.coerce("7"), ArgValue::Num(7.0));
        match ArgKind::Number.coerce("seven") {
            ArgValue::Num(n) => assert!(n.is_nan()),
            other => panic!("expected Num, got {:?}", other),
        }
    }
}
