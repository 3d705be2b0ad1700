//! Reference pools: the lists a document's classification fields point into.

use crate::error::FactoryError;
use crate::identity::{IdentityGenerator, ObjectId};
use crate::provider::{choose, ValueProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Category of a reference entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReferenceKind {
    Doctype,
    Author,
    Label,
    ProjectPhase,
    /// Any category the factory does not sample from itself
    Other(String),
}

impl From<String> for ReferenceKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "doctype" => ReferenceKind::Doctype,
            "author" => ReferenceKind::Author,
            "label" => ReferenceKind::Label,
            "projectPhase" => ReferenceKind::ProjectPhase,
            _ => ReferenceKind::Other(value),
        }
    }
}

impl From<ReferenceKind> for String {
    fn from(kind: ReferenceKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Doctype => write!(f, "doctype"),
            ReferenceKind::Author => write!(f, "author"),
            ReferenceKind::Label => write!(f, "label"),
            ReferenceKind::ProjectPhase => write!(f, "projectPhase"),
            ReferenceKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// One entry of a reference pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    #[serde(rename = "_id", alias = "id")]
    pub id: ObjectId,
    pub name: String,
}

impl ReferenceEntry {
    pub fn new(kind: ReferenceKind, id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
        }
    }
}

/// Immutable collection of reference entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePool {
    entries: Vec<ReferenceEntry>,
}

impl ReferencePool {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }

    /// Load a pool from a YAML or JSON file holding a sequence of entries
    pub fn load(path: &Path) -> Result<Self, FactoryError> {
        let load_err = |reason: String| FactoryError::PoolLoad {
            path: path.to_path_buf(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let entries: Vec<ReferenceEntry> = if is_json {
            serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?
        } else {
            serde_yaml_ng::from_str(&content).map_err(|e| load_err(e.to_string()))?
        };
        tracing::debug!("Loaded {} reference entries from {}", entries.len(), path.display());
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries of one kind, in pool order
    pub fn of_kind(&self, kind: &ReferenceKind) -> Vec<&ReferenceEntry> {
        self.entries.iter().filter(|e| &e.kind == kind).collect()
    }

    /// Uniformly sample an entry of `kind`
    pub fn sample_by_type(
        &self,
        kind: &ReferenceKind,
        provider: &mut dyn ValueProvider,
    ) -> Option<&ReferenceEntry> {
        let candidates = self.of_kind(kind);
        choose(provider, &candidates).copied()
    }

    /// Id of a sampled entry, or a fresh id when the pool has none of `kind`
    pub fn resolve_id_or_fresh(
        &self,
        kind: &ReferenceKind,
        provider: &mut dyn ValueProvider,
        identity: &IdentityGenerator,
    ) -> ObjectId {
        match self.sample_by_type(kind, provider) {
            Some(entry) => entry.id,
            None => identity.fresh_identifier(provider),
        }
    }

    /// Name of a sampled entry, or an empty string when the pool has none of `kind`
    pub fn resolve_name_or_empty(
        &self,
        kind: &ReferenceKind,
        provider: &mut dyn ValueProvider,
    ) -> String {
        self.sample_by_type(kind, provider)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }
}

impl FromIterator<ReferenceEntry> for ReferencePool {
    fn from_iter<I: IntoIterator<Item = ReferenceEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
