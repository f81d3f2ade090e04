use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::core::clustered::ClusteredVariant;
use crate::core::operation::Operation;
use crate::core::submitted::SubmittedVariant;
use crate::core::types::{Accession, EventType, VariantStatus};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse registry: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Registry format version for compatibility checking
pub const REGISTRY_VERSION: &str = "1.0.0";

/// Serializable registry format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryData {
    pub version: String,
    pub created_at: String,
    pub clustered: Vec<ClusteredVariant>,
    pub submitted: Vec<SubmittedVariant>,
    pub operations: Vec<Operation>,
}

/// Result of a bulk insert: how many records landed and which keys were
/// rejected as duplicates. Duplicates are an expected, benign outcome of
/// re-running idempotent operations; the caller reconciles counts instead of
/// aborting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkInsertOutcome {
    pub inserted: usize,
    pub duplicates: Vec<Accession>,
}

impl BulkInsertOutcome {
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// The variant registry: two keyed tables plus the append-only operation
/// history, with the indexes needed by the resolvers.
///
/// Cross-references between clustered and submitted variants are plain
/// foreign-key fields; all cross-record mutation goes through methods here,
/// so reference cycles never need traversal, only key lookups.
#[derive(Debug, Default)]
pub struct VariantRegistry {
    /// All clustered variants by accession
    clustered: BTreeMap<Accession, ClusteredVariant>,

    /// All submitted variants by accession
    submitted: BTreeMap<Accession, SubmittedVariant>,

    /// Append-only operation history, keyed by deterministic operation id
    operations: BTreeMap<String, Operation>,

    /// Index: canonical key -> accessions of *active* clustered variants
    key_to_clustered: HashMap<String, Vec<Accession>>,

    /// Index: clustered accession -> accessions of submitted variants
    /// referencing it
    clustered_to_submitted: HashMap<Accession, Vec<Accession>>,
}

impl VariantRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a registry from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ParseError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let data: RegistryData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != REGISTRY_VERSION {
            warn!(
                "Registry version mismatch (expected {}, found {})",
                REGISTRY_VERSION, data.version
            );
        }

        let mut registry = Self::new();
        for clustered in data.clustered {
            registry.upsert_clustered(clustered);
        }
        for submitted in data.submitted {
            registry.put_submitted(submitted);
        }
        for operation in data.operations {
            registry.append_operation(operation);
        }
        Ok(registry)
    }

    /// Export the registry to JSON
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let data = RegistryData {
            version: REGISTRY_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            clustered: self.clustered.values().cloned().collect(),
            submitted: self.submitted.values().cloned().collect(),
            operations: self.operations.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Write the registry to a JSON file
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if serialization or the write fails.
    pub fn save_to_file(&self, path: &Path) -> Result<(), RegistryError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    // === Clustered variants ===

    #[must_use]
    pub fn get_clustered(&self, accession: Accession) -> Option<&ClusteredVariant> {
        self.clustered.get(&accession)
    }

    /// Insert or replace a clustered variant, maintaining the key index
    pub fn upsert_clustered(&mut self, variant: ClusteredVariant) {
        let previous = self
            .clustered
            .get(&variant.accession)
            .map(|p| (p.accession, p.canonical_key()));
        if let Some((accession, key)) = previous {
            self.unindex_clustered_key(accession, &key);
        }
        if variant.is_active() {
            self.key_to_clustered
                .entry(variant.canonical_key())
                .or_default()
                .push(variant.accession);
        }
        self.clustered.insert(variant.accession, variant);
    }

    fn unindex_clustered_key(&mut self, accession: Accession, key: &str) {
        if let Some(accessions) = self.key_to_clustered.get_mut(key) {
            accessions.retain(|&a| a != accession);
            if accessions.is_empty() {
                self.key_to_clustered.remove(key);
            }
        }
    }

    /// Accessions of active clustered variants at a canonical key, ascending
    #[must_use]
    pub fn active_clustered_by_key(&self, key: &str) -> Vec<Accession> {
        let mut accessions = self
            .key_to_clustered
            .get(key)
            .cloned()
            .unwrap_or_default();
        accessions.sort_unstable();
        accessions
    }

    /// Bulk-insert clustered variants, continuing past duplicates.
    ///
    /// A record is a duplicate if its accession already exists, or if an
    /// active clustered variant already holds its canonical key (at most one
    /// active record per key). Failed keys are reported, not escalated.
    pub fn bulk_insert_clustered(&mut self, variants: Vec<ClusteredVariant>) -> BulkInsertOutcome {
        let mut outcome = BulkInsertOutcome::default();
        for variant in variants {
            let key_taken = variant.is_active()
                && !self.active_clustered_by_key(&variant.canonical_key()).is_empty();
            if self.clustered.contains_key(&variant.accession) || key_taken {
                outcome.duplicates.push(variant.accession);
                continue;
            }
            self.upsert_clustered(variant);
            outcome.inserted += 1;
        }
        if outcome.has_duplicates() {
            error!("Duplicate clustered variant accessions: {:?}", outcome.duplicates);
        }
        outcome
    }

    /// Mark a clustered variant as merged into a survivor.
    ///
    /// Returns the pre-merge snapshot, or None when the mergee has no
    /// materialized record (a legitimate state mid-remapping).
    pub fn mark_merged(
        &mut self,
        accession: Accession,
        into: Accession,
    ) -> Option<ClusteredVariant> {
        let snapshot = self.clustered.get(&accession).cloned()?;
        let mut merged = snapshot.clone();
        merged.status = VariantStatus::Merged;
        merged.merged_into = Some(into);
        self.upsert_clustered(merged);
        Some(snapshot)
    }

    /// Mark a clustered variant as deprecated, returning the prior snapshot
    pub fn mark_deprecated(&mut self, accession: Accession) -> Option<ClusteredVariant> {
        let snapshot = self.clustered.get(&accession).cloned()?;
        let mut deprecated = snapshot.clone();
        deprecated.status = VariantStatus::Deprecated;
        self.upsert_clustered(deprecated);
        Some(snapshot)
    }

    /// All clustered variants, ascending by accession
    pub fn clustered_variants(&self) -> impl Iterator<Item = &ClusteredVariant> {
        self.clustered.values()
    }

    // === Submitted variants ===

    #[must_use]
    pub fn get_submitted(&self, accession: Accession) -> Option<&SubmittedVariant> {
        self.submitted.get(&accession)
    }

    /// Insert or replace a submitted variant, maintaining the back-reference
    /// index
    pub fn put_submitted(&mut self, variant: SubmittedVariant) {
        let previous_rs = self
            .submitted
            .get(&variant.accession)
            .and_then(|p| p.clustered_variant_accession);
        if let Some(rs) = previous_rs {
            self.unindex_submitted(variant.accession, rs);
        }
        if let Some(rs) = variant.clustered_variant_accession {
            self.clustered_to_submitted
                .entry(rs)
                .or_default()
                .push(variant.accession);
        }
        self.submitted.insert(variant.accession, variant);
    }

    fn unindex_submitted(&mut self, accession: Accession, rs: Accession) {
        if let Some(accessions) = self.clustered_to_submitted.get_mut(&rs) {
            accessions.retain(|&a| a != accession);
            if accessions.is_empty() {
                self.clustered_to_submitted.remove(&rs);
            }
        }
    }

    /// Bulk-insert submitted variants, continuing past duplicate accessions
    pub fn bulk_insert_submitted(&mut self, variants: Vec<SubmittedVariant>) -> BulkInsertOutcome {
        let mut outcome = BulkInsertOutcome::default();
        for variant in variants {
            if self.submitted.contains_key(&variant.accession) {
                outcome.duplicates.push(variant.accession);
                continue;
            }
            self.put_submitted(variant);
            outcome.inserted += 1;
        }
        if outcome.has_duplicates() {
            error!("Duplicate submitted variant accessions: {:?}", outcome.duplicates);
        }
        outcome
    }

    /// Submitted variants referencing a clustered accession, ascending
    #[must_use]
    pub fn submitted_for(&self, clustered: Accession) -> Vec<&SubmittedVariant> {
        let mut accessions = self
            .clustered_to_submitted
            .get(&clustered)
            .cloned()
            .unwrap_or_default();
        accessions.sort_unstable();
        accessions
            .iter()
            .filter_map(|a| self.submitted.get(a))
            .collect()
    }

    /// Rewrite every back-reference from one clustered accession to another.
    ///
    /// Idempotent: rewriting an already-rewritten reference is a no-op.
    /// Returns the number of submitted variants rewritten.
    pub fn reassign_submitted(&mut self, from: Accession, to: Accession) -> usize {
        let accessions = self
            .clustered_to_submitted
            .get(&from)
            .cloned()
            .unwrap_or_default();
        for accession in &accessions {
            let variant = self.submitted.get(accession).cloned();
            if let Some(mut rewritten) = variant {
                rewritten.clustered_variant_accession = Some(to);
                self.put_submitted(rewritten);
            }
        }
        accessions.len()
    }

    /// All submitted variants, ascending by accession
    pub fn submitted_variants(&self) -> impl Iterator<Item = &SubmittedVariant> {
        self.submitted.values()
    }

    // === Operations ===

    /// Append an operation to the history.
    ///
    /// Idempotent over the operation's deterministic id: appending the same
    /// operation twice stores it once. Returns whether the record was new.
    pub fn append_operation(&mut self, operation: Operation) -> bool {
        if self.operations.contains_key(&operation.id) {
            return false;
        }
        self.operations.insert(operation.id.clone(), operation);
        true
    }

    /// The operation feed, filterable by event type and assembly.
    ///
    /// An operation matches an assembly filter when any of its snapshots
    /// belongs to that assembly.
    pub fn operations(
        &self,
        event_type: Option<EventType>,
        assembly: Option<&str>,
    ) -> impl Iterator<Item = &Operation> {
        let assembly = assembly.map(str::to_string);
        self.operations.values().filter(move |op| {
            if let Some(wanted) = event_type {
                if op.event_type != wanted {
                    return false;
                }
            }
            if let Some(ref wanted) = assembly {
                let in_clustered = op.inactive_clustered.iter().any(|v| &v.assembly == wanted);
                let in_submitted = op.inactive_submitted.iter().any(|v| &v.assembly == wanted);
                if !in_clustered && !in_submitted {
                    return false;
                }
            }
            true
        })
    }

    /// Highest accession present in either table, for seeding the generator
    #[must_use]
    pub fn max_accession(&self) -> Accession {
        let clustered = self.clustered.keys().next_back().copied().unwrap_or(0);
        let submitted = self.submitted.keys().next_back().copied().unwrap_or(0);
        clustered.max(submitted)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clustered.is_empty() && self.submitted.is_empty()
    }
}
