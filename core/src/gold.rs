//! Gold-standard loading: `base/<topic>/<doc id>` trees to a topic -> ids map.

use crate::error::{PrepError, Result};
use crate::tree::{self, TreeOrder};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Topic name to the document ids filed under it.
///
/// Ids keep enumeration order and are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoldStandard {
    topics: BTreeMap<String, Vec<DocId>>,
}

impl GoldStandard {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, topic: &str, id: DocId) {
        self.topics.entry(topic.to_string()).or_default().push(id);
    }

    pub fn get(&self, topic: &str) -> Option<&[DocId]> {
        self.topics.get(topic).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.topics.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize { self.topics.len() }

    pub fn is_empty(&self) -> bool { self.topics.is_empty() }

    pub fn total_docs(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }
}

/// Parse a filename as a document id: ASCII digits only, leading zeros allowed.
pub fn parse_doc_id(name: &str) -> Option<DocId> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

pub fn load_gold_standard(base: &Path, order: TreeOrder) -> Result<GoldStandard> {
    let mut gold = GoldStandard::new();
    for topic in tree::topics(base, order)? {
        // Topics with no files still get an (empty) entry.
        gold.topics.entry(topic.name.clone()).or_default();
        for file in tree::topic_files(&topic, order)? {
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let id = parse_doc_id(&name).ok_or_else(|| PrepError::InvalidDocId { topic: topic.name.clone(), name })?;
            gold.push(&topic.name, id);
        }
    }
    tracing::info!(base = %base.display(), topics = gold.len(), docs = gold.total_docs(), "loaded gold standard");
    Ok(gold)
}
