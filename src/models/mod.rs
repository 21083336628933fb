pub mod chat;
pub mod command;

pub use chat::{ChatChannel, ChatMessage, Chatter, DeliveryKind};
pub use command::{
    ArgKind, ArgSpec, ArgValue, CommandOptions, CommandPatch, ResponseType, TextCommandRecord,
    UserLevel,
};
