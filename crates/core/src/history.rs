use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    pub new_path: PathBuf,
    pub old_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoBatch {
    records: Vec<RenameRecord>,
}

impl UndoBatch {
    pub(crate) fn new(records: Vec<RenameRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RenameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn into_records(self) -> Vec<RenameRecord> {
        self.records
    }
}

#[derive(Debug, Clone)]
pub struct UndoHistory {
    batches: VecDeque<UndoBatch>,
    capacity: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl UndoHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            batches: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Batches from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &UndoBatch> {
        self.batches.iter().rev()
    }

    pub(crate) fn push(&mut self, batch: UndoBatch) {
        if batch.is_empty() {
            return;
        }
        self.batches.push_back(batch);
        while self.batches.len() > self.capacity {
            self.batches.pop_front();
        }
    }

    pub(crate) fn pop(&mut self) -> Option<UndoBatch> {
        self.batches.pop_back()
    }
}
