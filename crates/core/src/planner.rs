use crate::cleaner::clean_name;
use crate::error::{RenameError, RenameResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameSpec {
    Explicit(Vec<String>),
    Indexed(String),
}

impl NameSpec {
    /// A comma separated input is a list of explicit names, anything else is
    /// a single base name. Names are cleaned, empty list entries dropped.
    pub fn parse(input: &str) -> RenameResult<Self> {
        if input.contains(',') {
            let names: Vec<String> = input
                .split(',')
                .map(clean_name)
                .filter(|name| !name.is_empty())
                .collect();
            if names.is_empty() {
                return Err(RenameError::InvalidInput(format!(
                    "no usable name in list: {input:?}"
                )));
            }
            Ok(Self::Explicit(names))
        } else {
            let base = clean_name(input);
            if base.is_empty() {
                return Err(RenameError::InvalidInput(format!(
                    "no usable base name: {input:?}"
                )));
            }
            Ok(Self::Indexed(base))
        }
    }

    pub fn stem_for(&self, index: usize) -> Option<String> {
        let position = index + 1;
        let stem = match self {
            Self::Explicit(names) => match names.get(index) {
                Some(name) => clean_name(name),
                None => clean_name(&format!("{}_{}", names.first()?, position)),
            },
            Self::Indexed(base) => clean_name(&format!("{base}_{position}")),
        };
        Some(stem).filter(|s| !s.is_empty())
    }
}

impl FromStr for NameSpec {
    type Err = RenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub entries: Vec<PlannedRename>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn replace_stem(path: &Path, stem: &str) -> PathBuf {
    let mut name = OsString::from(stem);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

pub fn plan_batch(paths: &[PathBuf], spec: &NameSpec) -> RenameResult<BatchPlan> {
    if paths.is_empty() {
        return Err(RenameError::InvalidInput("no files selected".to_string()));
    }

    let mut seen_sources = HashSet::<PathBuf>::new();
    let mut seen_targets = HashSet::<PathBuf>::new();
    let mut entries = Vec::with_capacity(paths.len());

    for (index, path) in paths.iter().enumerate() {
        if !path.exists() {
            return Err(RenameError::NotFound { path: path.clone() });
        }
        let source_canonical =
            fs::canonicalize(path).map_err(|err| RenameError::io(path, err))?;
        if !seen_sources.insert(source_canonical) {
            return Err(RenameError::InvalidInput(format!(
                "file listed twice in batch: {}",
                path.display()
            )));
        }

        let stem = spec.stem_for(index).ok_or_else(|| {
            RenameError::InvalidInput(format!("no usable name for {}", path.display()))
        })?;
        let target = replace_stem(path, &stem);

        if !seen_targets.insert(normalized_target(&target)?) {
            return Err(RenameError::Conflict { path: target });
        }
        if target.exists() {
            return Err(RenameError::Conflict { path: target });
        }

        entries.push(PlannedRename {
            from: path.clone(),
            to: target,
        });
    }

    Ok(BatchPlan { entries })
}

fn normalized_target(target: &Path) -> RenameResult<PathBuf> {
    let name = target.file_name().ok_or_else(|| {
        RenameError::InvalidInput(format!("invalid target name: {}", target.display()))
    })?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent).map_err(|err| RenameError::io(parent, err))?;
    Ok(parent.join(name))
}

pub fn collect_files(
    inputs: &[PathBuf],
    recursive: bool,
    include_hidden: bool,
) -> RenameResult<Vec<PathBuf>> {
    let mut out = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(RenameError::NotFound {
                path: input.clone(),
            });
        }
        if input.is_file() {
            out.push(input.clone());
            continue;
        }

        if recursive {
            let walker = WalkDir::new(input)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| include_hidden || !is_hidden(entry.path()));
            for entry in walker {
                let entry = entry.map_err(|err| RenameError::io(input, io::Error::from(err)))?;
                if entry.file_type().is_file() {
                    out.push(entry.into_path());
                }
            }
        } else {
            let mut files = Vec::new();
            for entry in fs::read_dir(input).map_err(|err| RenameError::io(input, err))? {
                let entry = entry.map_err(|err| RenameError::io(input, err))?;
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                if is_hidden(&path) && !include_hidden {
                    continue;
                }
                files.push(path);
            }
            files.sort();
            out.extend(files);
        }
    }

    Ok(out)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
