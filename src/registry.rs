//! Ordered collection of command descriptors and their handlers.
//!
//! Registration order is significant: duplicate names are allowed by
//! construction and lookup always returns the first match, so callers
//! must avoid collisions.

use std::sync::{Arc, RwLock};

use crate::commands::CommandHandler;
use crate::models::{CommandOptions, CommandPatch};

/// A descriptor paired with the handler that runs it.
#[derive(Clone)]
pub struct CommandEntry {
    pub options: CommandOptions,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandEntry {
    pub fn new(options: CommandOptions, handler: Arc<dyn CommandHandler>) -> Self {
        Self { options, handler }
    }
}

pub struct CommandRegistry {
    entries: RwLock<Vec<CommandEntry>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, entry: CommandEntry) {
        self.entries.write().unwrap().push(entry);
    }

    /// Resolve a command token: exact name match first, then the alias
    /// lists, both in registration order.
    pub fn find(&self, token: &str) -> Option<CommandEntry> {
        let entries = self.entries.read().unwrap();

        if let Some(entry) = entries.iter().find(|e| e.options.name == token) {
            return Some(entry.clone());
        }

        entries
            .iter()
            .find(|e| e.options.aliases.iter().any(|a| a == token))
            .cloned()
    }

    /// Exact-name descriptor lookup (help output, REST reads).
    pub fn get(&self, name: &str) -> Option<CommandOptions> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.options.name == name)
            .map(|e| e.options.clone())
    }

    pub fn remove(&self, name: &str) -> bool {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|e| e.options.name != name);
        entries.len() != before
    }

    /// Merge patch fields into every descriptor with the given name,
    /// preserving identity. Returns false when nothing matched.
    pub fn update_partial(&self, name: &str, patch: &CommandPatch) -> bool {
        let mut entries = self.entries.write().unwrap();
        let mut touched = false;
        for entry in entries.iter_mut().filter(|e| e.options.name == name) {
            patch.apply(&mut entry.options);
            touched = true;
        }
        touched
    }

    /// Replace the descriptor+handler for `name`, or append when absent.
    pub fn upsert(&self, entry: CommandEntry) {
        let mut entries = self.entries.write().unwrap();
        if let Some(existing) = entries.iter_mut().find(|e| e.options.name == entry.options.name) {
            *existing = entry;
        } else {
            entries.push(entry);
        }
    }

    pub fn list(&self) -> Vec<CommandOptions> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .map(|e| e.options.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::NamedParams;
    use crate::commands::CommandContext;
    use crate::error::Error;
    use crate::models::{ChatMessage, UserLevel};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn run(
            &self,
            _ctx: CommandContext,
            _msg: ChatMessage,
            _params: NamedParams,
        ) -> Result<Option<String>, Error> {
            Ok(None)
        }
    }

    fn entry(options: CommandOptions) -> CommandEntry {
        CommandEntry::new(options, Arc::new(Noop))
    }

    #[test]
    fn name_and_alias_resolve_to_the_same_descriptor() {
        let registry = CommandRegistry::new();
        let mut options = CommandOptions::named("commands");
        options.aliases = vec!["help".to_string()];
        registry.register(entry(options));

        let by_name = registry.find("commands").expect("name lookup");
        let by_alias = registry.find("help").expect("alias lookup");
        assert_eq!(by_name.options.name, "commands");
        assert_eq!(by_alias.options.name, "commands");
    }

    #[test]
    fn first_registered_wins_on_duplicate_names() {
        let registry = CommandRegistry::new();

        let mut first = CommandOptions::named("dup");
        first.description = "first".to_string();
        registry.register(entry(first));

        let mut second = CommandOptions::named("dup");
        second.description = "second".to_string();
        registry.register(entry(second));

        assert_eq!(registry.find("dup").unwrap().options.description, "first");
    }

    #[test]
    fn exact_name_beats_an_earlier_alias() {
        let registry = CommandRegistry::new();

        let mut aliased = CommandOptions::named("other");
        aliased.aliases = vec!["ping".to_string()];
        registry.register(entry(aliased));
        registry.register(entry(CommandOptions::named("ping")));

        assert_eq!(registry.find("ping").unwrap().options.name, "ping");
    }

    #[test]
    fn remove_and_update_partial() {
        let registry = CommandRegistry::new();
        registry.register(entry(CommandOptions::named("greet")));

        let patch = CommandPatch {
            userlevel: Some(UserLevel::Vip),
            ..Default::default()
        };
        assert!(registry.update_partial("greet", &patch));
        assert_eq!(registry.get("greet").unwrap().userlevel, UserLevel::Vip);

        assert!(registry.remove("greet"));
        assert!(registry.find("greet").is_none());
        assert!(!registry.remove("greet"));
    }

    #[test]
    fn upsert_replaces_in_place() {
        let registry = CommandRegistry::new();
        let mut options = CommandOptions::named("lurk");
        options.text = Some("old".to_string());
        registry.register(entry(options));

        let mut replacement = CommandOptions::named("lurk");
        replacement.text = Some("new".to_string());
        registry.upsert(entry(replacement));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("lurk").unwrap().text.as_deref(),
            Some("new")
        );
    }
}
