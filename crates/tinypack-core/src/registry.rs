use indexmap::IndexMap;
use serde::Serialize;

use crate::module_id::ModuleId;

/// A module as it will appear in the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub source_code: String,
}

/// Insertion-ordered mapping from module id to its rewritten source.
///
/// An id is inserted at most once; records are never replaced or removed.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ModuleRegistry {
    modules: IndexMap<ModuleId, ModuleRecord>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Returns `false` and keeps the existing record if the id is
    /// already present.
    pub fn insert(&mut self, record: ModuleRecord) -> bool {
        if self.modules.contains_key(&record.id) {
            return false;
        }
        self.modules.insert(record.id.clone(), record);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ModuleRecord> {
        self.modules.get(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.keys()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }
}
