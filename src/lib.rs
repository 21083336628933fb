// src/lib.rs
//
// Command-dispatch engine for Twitch chat bots: parse a prefixed
// invocation, resolve it against the registry, validate access, bind
// typed arguments, invoke the handler, and gate every outbound reply
// behind the shared send budget.

pub mod api;
pub mod args;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod eventbus;
pub mod models;
pub mod parser;
pub mod rate_limit;
pub mod registry;
pub mod sender;
pub mod store;
pub mod test_utils;
pub mod transport;
pub mod validate;

pub use config::ClientOptions;
pub use dispatcher::{ClientBuilder, CommandClient};
pub use error::Error;
pub use eventbus::{ClientEvent, EventBus};
pub use registry::{CommandEntry, CommandRegistry};
