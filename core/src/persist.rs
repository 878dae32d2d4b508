use crate::error::{PrepError, Result};
use crate::gold::GoldStandard;
use crate::strip::TreeReport;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

pub const GOLD_FILE_VERSION: u32 = 1;

/// On-disk form of a gold standard, as consumed by evaluation tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldFile {
    pub created_at: String,
    pub version: u32,
    pub num_topics: usize,
    pub num_docs: usize,
    pub topics: GoldStandard,
}

impl GoldFile {
    pub fn new(topics: GoldStandard, created_at: String) -> Self {
        Self {
            created_at,
            version: GOLD_FILE_VERSION,
            num_topics: topics.len(),
            num_docs: topics.total_docs(),
            topics,
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| PrepError::io(parent, e))?;
    }
    let mut f = File::create(path).map_err(|e| PrepError::io(path, e))?;
    let json = serde_json::to_string_pretty(value)?;
    f.write_all(json.as_bytes()).map_err(|e| PrepError::io(path, e))?;
    Ok(())
}

pub fn save_gold_file(path: &Path, gold: &GoldFile) -> Result<()> {
    write_json(path, gold)
}

pub fn load_gold_file(path: &Path) -> Result<GoldFile> {
    let mut f = File::open(path).map_err(|e| PrepError::io(path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| PrepError::io(path, e))?;
    let gold: GoldFile = serde_json::from_str(&buf)?;
    Ok(gold)
}

pub fn save_report(path: &Path, report: &TreeReport) -> Result<()> {
    write_json(path, report)
}
