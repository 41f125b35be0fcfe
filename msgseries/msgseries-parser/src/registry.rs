//! Shared channel → signal-name store for two-phase "names, then values"
//! message pairs.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::error::ParseError;

/// Cloneable handle to one set of signal-name registrations.
///
/// Every clone observes the same entries. Each operation takes the lock
/// once, so a lookup never sees a half-written registration.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `names` for `channel`, replacing any previous list.
    pub fn register(&self, channel: &str, names: Vec<String>) {
        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.to_string(), names);
        if let Some(previous) = previous {
            tracing::trace!(channel, replaced = previous.len(), "signal names re-registered");
        }
    }

    pub fn has(&self, channel: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(channel)
    }

    /// Names registered for `channel`, in registration order.
    pub fn get(&self, channel: &str) -> Result<Vec<String>, ParseError> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .ok_or_else(|| ParseError::MissingSchema {
                channel: channel.to_string(),
            })
    }

    /// Remove the entry for `channel`, if any.
    pub fn reset(&self, channel: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(channel);
    }

    /// Registered channels, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        out.sort();
        out
    }
}
