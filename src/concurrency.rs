//! Per-repository cache slots
//!
//! Each repository gets one slot guarded by an async mutex. The mutex is held
//! for the whole of a materialization pass, so at most one pass per repository
//! runs at a time and concurrent callers wait for its result instead of
//! starting their own.

use crate::tree::TreeCache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cache state of one repository
///
/// A pass in progress is represented by the slot's mutex being held while the
/// state is still `Empty`; it becomes `Materialized` only once the pass has
/// succeeded.
#[derive(Debug, Clone, Default)]
pub enum SlotState {
    #[default]
    Empty,
    Materialized(Arc<TreeCache>),
}

impl SlotState {
    pub fn cache(&self) -> Option<Arc<TreeCache>> {
        match self {
            SlotState::Empty => None,
            SlotState::Materialized(cache) => Some(cache.clone()),
        }
    }
}

pub type Slot = Arc<Mutex<SlotState>>;

/// Registry of repository slots owned by one filesystem handle
pub struct RepositorySlots {
    slots: RwLock<HashMap<String, Slot>>,
}

impl RepositorySlots {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the slot for a repository
    pub fn get(&self, repository: &str) -> Slot {
        {
            let map = self.slots.read();
            if let Some(slot) = map.get(repository) {
                return slot.clone();
            }
        }

        let mut map = self.slots.write();
        // Another caller may have created it between the two locks
        map.entry(repository.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlotState::Empty)))
            .clone()
    }

    /// Slot for a repository only if one was ever created
    pub fn existing(&self, repository: &str) -> Option<Slot> {
        self.slots.read().get(repository).cloned()
    }
}

impl Default for RepositorySlots {
    fn default() -> Self {
        Self::new()
    }
}
