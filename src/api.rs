//! REST-boundary contract for command configuration. The HTTP server
//! and router are an external collaborator; this type is what its
//! routes call:
//!
//! - `GET  /commands`        → [`ConfigSyncApi::get_commands`]
//! - `GET  /commands/{name}` → [`ConfigSyncApi::get_command`]
//! - `PUT  /commands/{name}` → [`ConfigSyncApi::put_command`]
//!
//! Error cases map onto status codes via [`status_code`].

use std::sync::Arc;

use crate::error::Error;
use crate::models::{CommandOptions, CommandPatch};
use crate::registry::CommandRegistry;
use crate::store::TextCommandStore;

pub struct ConfigSyncApi {
    registry: Arc<CommandRegistry>,
    store: Arc<TextCommandStore>,
}

impl ConfigSyncApi {
    pub fn new(registry: Arc<CommandRegistry>, store: Arc<TextCommandStore>) -> Self {
        Self { registry, store }
    }

    /// Full descriptor list, live view.
    pub fn get_commands(&self) -> Vec<CommandOptions> {
        self.registry.list()
    }

    pub fn get_command(&self, name: &str) -> Result<CommandOptions, Error> {
        self.registry
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("Command '{}' not found", name)))
    }

    /// Merge a partial-fields body into the named descriptor, persisted
    /// and live, through the same writer the in-chat manager uses.
    pub fn put_command(&self, name: &str, patch: &CommandPatch) -> Result<CommandOptions, Error> {
        if name.is_empty() {
            return Err(Error::BadRequest("Missing command name!".to_string()));
        }
        if patch.is_empty() {
            return Err(Error::BadRequest("Missing request body!".to_string()));
        }
        // Same rule the in-chat manager enforces on `txt set`.
        if patch.text.as_deref() == Some("") {
            return Err(Error::BadRequest("Text argument required".to_string()));
        }

        if !self.store.apply_patch(name, patch)? {
            return Err(Error::NotFound(format!("Command '{}' is not found!", name)));
        }

        self.get_command(name)
    }
}

/// Status code an HTTP adapter should answer with for a given error.
pub fn status_code(err: &Error) -> u16 {
    match err {
        Error::NotFound(_) => 404,
        Error::BadRequest(_) => 400,
        _ => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(status_code(&Error::NotFound("x".to_string())), 404);
        assert_eq!(status_code(&Error::BadRequest("x".to_string())), 400);
        assert_eq!(status_code(&Error::Handler("x".to_string())), 500);
    }
}
