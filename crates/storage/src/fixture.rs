//! Minimal record kind for store tests

use rxregistry_core::{ContentHash, Principal, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub id: u64,
    pub name: String,
    pub hash: ContentHash,
    pub creator: Principal,
    pub version: u64,
}

impl Record for Entry {
    type Key = u64;
    type IndexKey = String;
    type Changes = String;

    const KIND: &'static str = "entry";

    fn index_key(&self) -> String {
        self.name.clone()
    }

    fn content_hash(&self) -> &ContentHash {
        &self.hash
    }

    fn creator(&self) -> &Principal {
        &self.creator
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Entry whose hash byte is derived from its id
pub(crate) fn entry(id: u64, name: &str, version: u64) -> Entry {
    Entry {
        id,
        name: name.to_string(),
        hash: ContentHash::filled(id as u8),
        creator: Principal::new("ST1TEST"),
        version,
    }
}
