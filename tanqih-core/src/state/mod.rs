use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::FileStatus;

pub mod store;

pub use store::StateStore;

/// Durable progress of the whole corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingState {
    /// Fully cleaned files, in completion order.
    #[serde(default)]
    pub processed_files: Vec<String>,
    /// Started files and the exclusive end of their last committed chunk.
    #[serde(default)]
    pub partially_processed: BTreeMap<String, u64>,
}

impl ProcessingState {
    pub fn is_processed(&self, name: &str) -> bool {
        self.processed_files.iter().any(|f| f == name)
    }

    pub fn checkpoint(&self, name: &str) -> Option<u64> {
        self.partially_processed.get(name).copied()
    }

    pub fn status(&self, name: &str) -> FileStatus {
        if self.is_processed(name) {
            FileStatus::Completed
        } else if let Some(offset) = self.checkpoint(name) {
            FileStatus::InProgress { offset }
        } else {
            FileStatus::Untouched
        }
    }

    /// Record that everything before `offset` has been handled.
    pub fn advance(&mut self, name: &str, offset: u64) {
        debug_assert!(!self.is_processed(name));
        debug_assert!(self.checkpoint(name).is_none_or(|prev| prev < offset));
        self.partially_processed.insert(name.to_string(), offset);
    }

    pub fn complete(&mut self, name: &str) {
        self.partially_processed.remove(name);
        if !self.is_processed(name) {
            self.processed_files.push(name.to_string());
        }
    }

    /// Restores the "never both completed and partial" invariant after load.
    pub(crate) fn normalize(&mut self) {
        let processed = &self.processed_files;
        self.partially_processed.retain(|name, _| {
            let keep = !processed.iter().any(|f| f == name);
            if !keep {
                warn!("State lists {name} as both completed and partial; treating it as completed");
            }
            keep
        });
    }
}
