pub mod text_commands;

pub use text_commands::TextCommandStore;
