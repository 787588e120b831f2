use crate::cleaner::clean_name;
use crate::error::{RenameError, RenameResult};
use crate::history::{RenameRecord, UndoBatch, UndoHistory};
use crate::planner::{plan_batch, replace_stem, BatchPlan, NameSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of reverting one undo batch. `requested` is the size of the batch;
/// records whose renamed file vanished (or whose original name is taken
/// again) are listed in `skipped` instead of being restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoOutcome {
    pub requested: usize,
    pub restored: usize,
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct RenameEngine {
    history: UndoHistory,
}

impl RenameEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: UndoHistory::with_capacity(capacity),
        }
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// What `path` would become with `new_stem`. Does not clean the stem or
    /// look at the filesystem.
    pub fn preview(&self, path: &Path, new_stem: &str) -> PathBuf {
        replace_stem(path, new_stem)
    }

    pub fn rename_one(&mut self, path: &Path, new_stem: &str) -> RenameResult<PathBuf> {
        let stem = clean_name(new_stem);
        if stem.is_empty() {
            return Err(RenameError::InvalidInput(format!(
                "no usable name: {new_stem:?}"
            )));
        }
        let new_path = replace_stem(path, &stem);

        if !path.exists() {
            return Err(RenameError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if new_path.exists() {
            return Err(RenameError::Conflict { path: new_path });
        }

        fs::rename(path, &new_path).map_err(|err| RenameError::io(path, err))?;
        info!(from = %path.display(), to = %new_path.display(), "renamed file");

        self.history.push(UndoBatch::new(vec![RenameRecord {
            new_path: new_path.clone(),
            old_path: path.to_path_buf(),
        }]));
        Ok(new_path)
    }

    pub fn plan_batch(&self, paths: &[PathBuf], spec: &NameSpec) -> RenameResult<BatchPlan> {
        plan_batch(paths, spec)
    }

    pub fn rename_batch(
        &mut self,
        paths: &[PathBuf],
        spec: &NameSpec,
    ) -> RenameResult<Vec<PathBuf>> {
        let plan = plan_batch(paths, spec)?;
        self.apply_plan(plan)
    }

    pub fn apply_plan(&mut self, plan: BatchPlan) -> RenameResult<Vec<PathBuf>> {
        if plan.is_empty() {
            return Err(RenameError::InvalidInput("no files selected".to_string()));
        }

        let mut records = Vec::<RenameRecord>::with_capacity(plan.len());
        for entry in plan.entries {
            if entry.to.exists() {
                self.roll_back(records);
                return Err(RenameError::Conflict { path: entry.to });
            }
            if let Err(err) = fs::rename(&entry.from, &entry.to) {
                let apply_err = RenameError::io(&entry.from, err);
                warn!(
                    error = %apply_err,
                    applied = records.len(),
                    "batch rename failed, rolling back"
                );
                self.roll_back(records);
                return Err(apply_err);
            }
            debug!(from = %entry.from.display(), to = %entry.to.display(), "renamed file");
            records.push(RenameRecord {
                new_path: entry.to,
                old_path: entry.from,
            });
        }

        let new_paths: Vec<PathBuf> = records.iter().map(|r| r.new_path.clone()).collect();
        info!(count = new_paths.len(), "batch renamed");
        self.history.push(UndoBatch::new(records));
        Ok(new_paths)
    }

    pub fn undo(&mut self) -> RenameResult<UndoOutcome> {
        let batch = self.history.pop().ok_or(RenameError::NothingToUndo)?;
        let requested = batch.len();
        let mut restored = 0usize;
        let mut skipped = Vec::new();

        let mut records = batch.into_records();
        for index in (0..records.len()).rev() {
            let record = &records[index];
            if !record.new_path.exists() {
                warn!(path = %record.new_path.display(), "renamed file is gone, skipping");
                skipped.push(record.new_path.clone());
                continue;
            }
            if record.old_path.exists() {
                warn!(path = %record.old_path.display(), "original name is taken, skipping");
                skipped.push(record.new_path.clone());
                continue;
            }
            if let Err(err) = fs::rename(&record.new_path, &record.old_path) {
                let undo_err = RenameError::io(&record.new_path, err);
                // The failed record and everything before it stay undoable.
                records.truncate(index + 1);
                warn!(
                    error = %undo_err,
                    restored,
                    remaining = records.len(),
                    "undo failed, keeping the rest of the batch"
                );
                self.history.push(UndoBatch::new(records));
                return Err(undo_err);
            }
            restored += 1;
        }

        info!(requested, restored, "undo finished");
        Ok(UndoOutcome {
            requested,
            restored,
            skipped,
        })
    }

    fn roll_back(&mut self, records: Vec<RenameRecord>) {
        let mut leftovers = Vec::new();
        for record in records.into_iter().rev() {
            if !record.new_path.exists() {
                warn!(path = %record.new_path.display(), "renamed file is gone, not rolling back");
                continue;
            }
            if record.old_path.exists() {
                warn!(
                    path = %record.old_path.display(),
                    "original name is taken, not rolling back"
                );
                leftovers.push(record);
                continue;
            }
            if let Err(err) = fs::rename(&record.new_path, &record.old_path) {
                warn!(
                    from = %record.new_path.display(),
                    to = %record.old_path.display(),
                    error = %err,
                    "rollback failed"
                );
                leftovers.push(record);
            }
        }

        if !leftovers.is_empty() {
            leftovers.reverse();
            warn!(count = leftovers.len(), "partial batch kept in undo history");
            self.history.push(UndoBatch::new(leftovers));
        }
    }
}
