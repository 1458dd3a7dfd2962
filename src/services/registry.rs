use std::collections::HashMap;

use log::warn;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::model::entry::{SourceLocation, TranscriptEntry};

pub fn content_digest(lines: &[String]) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Registration {
    Accepted,
    Duplicate {
        first: SourceLocation,
        /// Content matches the first occurrence exactly
        identical: bool,
    },
}

/// First occurrence of each identifier wins; later ones are reported, not kept.
#[derive(Debug, Default)]
pub struct EntryRegistry {
    first_seen: HashMap<String, (SourceLocation, String)>,
    accepted: Vec<TranscriptEntry>,
    duplicates: usize,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: TranscriptEntry) -> Registration {
        let digest = content_digest(&entry.lines);

        if let Some((first, first_digest)) = self.first_seen.get(&entry.identifier) {
            self.duplicates += 1;
            let identical = *first_digest == digest;
            warn!(
                "duplicate entry {} at {} (first at {}, {})",
                entry.identifier,
                entry.location,
                first,
                if identical { "identical" } else { "differs" }
            );
            return Registration::Duplicate {
                first: first.clone(),
                identical,
            };
        }

        self.first_seen.insert(
            entry.identifier.clone(),
            (entry.location.clone(), digest),
        );
        self.accepted.push(entry);
        Registration::Accepted
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = TranscriptEntry>) {
        for e in entries {
            self.register(e);
        }
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Accepted entries, sorted by identifier.
    pub fn into_entries(self) -> Vec<TranscriptEntry> {
        let mut out = self.accepted;
        out.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        out
    }
}
