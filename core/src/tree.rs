//! One-level enumeration of `root/<topic>/<file>` trees.

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Order in which directory entries are visited.
///
/// `Filesystem` is whatever the host returns and is not guaranteed to be
/// stable across machines; `Sorted` orders by file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeOrder {
    #[default]
    Filesystem,
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub path: PathBuf,
}

fn children(dir: &Path, order: TreeOrder) -> Result<Vec<DirEntry>> {
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if order == TreeOrder::Sorted {
        walker = walker.sort_by_file_name();
    }
    walker
        .into_iter()
        .map(|entry| entry.map_err(|source| PrepError::Walk { path: dir.to_path_buf(), source }))
        .collect()
}

/// Immediate subdirectories of `root`. Plain files at this level are skipped.
pub fn topics(root: &Path, order: TreeOrder) -> Result<Vec<Topic>> {
    let mut out = Vec::new();
    for entry in children(root, order)? {
        // Path::is_dir follows symlinks, so a linked topic directory counts.
        if !entry.path().is_dir() {
            tracing::debug!(path = %entry.path().display(), "skipping non-directory entry");
            continue;
        }
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| PrepError::TopicName(entry.path().to_path_buf()))?
            .to_string();
        out.push(Topic { name, path: entry.into_path() });
    }
    Ok(out)
}

/// Regular files directly inside a topic directory.
pub fn topic_files(topic: &Topic, order: TreeOrder) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in children(&topic.path, order)? {
        if !entry.path().is_file() {
            tracing::debug!(topic = %topic.name, path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        out.push(entry.into_path());
    }
    Ok(out)
}
