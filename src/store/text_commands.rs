//! Persisted text-command records plus their live mirror in the
//! registry. Every mutation path (in-chat manager actions and the REST
//! boundary) funnels through this one writer, which updates the
//! document and the live descriptor under the same lock.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::text_command::TextCommand;
use crate::error::Error;
use crate::models::{CommandPatch, ResponseType, TextCommandRecord, UserLevel};
use crate::registry::{CommandEntry, CommandRegistry};

/// On-disk layout: one JSON document holding a keyed collection,
/// seeded on first use.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    commands: Vec<TextCommandRecord>,
}

pub struct TextCommandStore {
    path: PathBuf,
    registry: Arc<CommandRegistry>,
    records: Mutex<Vec<TextCommandRecord>>,
}

impl TextCommandStore {
    /// Load (or seed) the document at `path` and mirror every record
    /// into the registry as a live text-command descriptor.
    pub fn open(path: &Path, registry: Arc<CommandRegistry>) -> Result<Self, Error> {
        let document = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<StoreDocument>(&raw)?
        } else {
            let seeded = StoreDocument::default();
            fs::write(path, serde_json::to_string_pretty(&seeded)?)?;
            seeded
        };

        info!(
            path = %path.display(),
            count = document.commands.len(),
            "loaded text-command store"
        );

        for record in &document.commands {
            registry.upsert(CommandEntry::new(record.to_options(), Arc::new(TextCommand)));
        }

        Ok(Self {
            path: path.to_path_buf(),
            registry,
            records: Mutex::new(document.commands),
        })
    }

    fn persist(&self, records: &[TextCommandRecord]) -> Result<(), Error> {
        let document = StoreDocument {
            commands: records.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }

    /// Create or update a text command. New records start at userlevel
    /// `everyone` with a plain reply.
    pub fn set(&self, name: &str, text: &str) -> Result<TextCommandRecord, Error> {
        let record = {
            let mut records = self.records.lock().unwrap();

            let record = match records.iter_mut().find(|r| r.name == name) {
                Some(existing) => {
                    existing.text = text.to_string();
                    existing.clone()
                }
                None => {
                    let created = TextCommandRecord {
                        name: name.to_string(),
                        text: text.to_string(),
                        userlevel: UserLevel::Everyone,
                        message_type: ResponseType::Reply,
                    };
                    records.push(created.clone());
                    created
                }
            };

            self.persist(&records)?;
            record
        };

        debug!(name, "text command set");
        self.registry
            .upsert(CommandEntry::new(record.to_options(), Arc::new(TextCommand)));
        Ok(record)
    }

    pub fn get(&self, name: &str) -> Option<TextCommandRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }

    /// Remove the persisted record and its live descriptor. Returns
    /// false when no record exists.
    pub fn unset(&self, name: &str) -> Result<bool, Error> {
        let removed = {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.name != name);
            if records.len() == before {
                return Ok(false);
            }
            self.persist(&records)?;
            true
        };

        debug!(name, "text command unset");
        self.registry.remove(name);
        Ok(removed)
    }

    /// The shared writer: merge patch fields into the persisted record
    /// (when one exists) and into the live descriptor. Returns false
    /// when neither side knows the name.
    pub fn apply_patch(&self, name: &str, patch: &CommandPatch) -> Result<bool, Error> {
        let record_touched = {
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.name == name) {
                Some(record) => {
                    if let Some(text) = &patch.text {
                        record.text = text.clone();
                    }
                    if let Some(level) = patch.userlevel {
                        record.userlevel = level;
                    }
                    if let Some(kind) = patch.message_type {
                        record.message_type = kind;
                    }
                    self.persist(&records)?;
                    true
                }
                None => false,
            }
        };

        let live_touched = self.registry.update_partial(name, patch);
        if record_touched || live_touched {
            debug!(name, "text command patched");
        }
        Ok(record_touched || live_touched)
    }

    pub fn records(&self) -> Vec<TextCommandRecord> {
        self.records.lock().unwrap().clone()
    }
}
