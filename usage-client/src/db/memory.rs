use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::{anyhow, Result};

use super::UsageCollection;

/// In-process collection used in place of the document store.
///
/// Every lookup key is recorded, and the collection can be switched into a
/// failing mode to simulate an unreachable store.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    docs: HashMap<(String, String), serde_json::Value>,
    failure: Option<String>,
    lookups: Vec<(String, String)>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::default(),
        }
    }

    pub fn insert(&self, date: &str, home_id: &str, doc: serde_json::Value) {
        self.lock()
            .docs
            .insert((date.to_string(), home_id.to_string()), doc);
    }

    /// Make every subsequent lookup fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    /// `(date, home_id)` pairs looked up so far, oldest first.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lock().lookups.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // Poisoning is ignored: the state is plain data.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl UsageCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, date: &str, home_id: &str) -> Result<Option<serde_json::Value>> {
        let mut state = self.lock();
        state.lookups.push((date.to_string(), home_id.to_string()));

        if let Some(message) = &state.failure {
            return Err(anyhow!("{}: {message}", self.name));
        }

        Ok(state
            .docs
            .get(&(date.to_string(), home_id.to_string()))
            .cloned())
    }
}
