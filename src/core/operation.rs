use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clustered::ClusteredVariant;
use crate::core::submitted::SubmittedVariant;
use crate::core::types::{Accession, EventType};

/// One record in the append-only operation history.
///
/// Operations are the sole record of an accession's provenance after it stops
/// being active. The `id` is deterministic over (event type, source,
/// destination) so that replaying an idempotent merge or split appends
/// exactly one record, not two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Deterministic identity of this operation
    pub id: String,

    pub event_type: EventType,

    /// Accession the event happened to
    pub accession: Accession,

    /// Destination accession, e.g. the merge survivor or a split product
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Accession>,

    /// Free-text reason naming the triggering context
    pub reason: String,

    /// Snapshot of clustered-variant records inactivated by this event
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inactive_clustered: Vec<ClusteredVariant>,

    /// Snapshot of submitted-variant records affected by this event
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inactive_submitted: Vec<SubmittedVariant>,

    pub created: DateTime<Utc>,
}

impl Operation {
    pub fn new(
        event_type: EventType,
        accession: Accession,
        destination: Option<Accession>,
        reason: impl Into<String>,
    ) -> Self {
        let id = match destination {
            Some(dest) => format!("{event_type}:{accession}:{dest}"),
            None => format!("{event_type}:{accession}"),
        };
        Self {
            id,
            event_type,
            accession,
            destination,
            reason: reason.into(),
            inactive_clustered: Vec::new(),
            inactive_submitted: Vec::new(),
            created: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_clustered_snapshot(mut self, snapshot: ClusteredVariant) -> Self {
        self.inactive_clustered.push(snapshot);
        self
    }

    #[must_use]
    pub fn with_clustered_snapshots(mut self, snapshots: Vec<ClusteredVariant>) -> Self {
        self.inactive_clustered = snapshots;
        self
    }

    #[must_use]
    pub fn with_submitted_snapshots(mut self, snapshots: Vec<SubmittedVariant>) -> Self {
        self.inactive_submitted = snapshots;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_id_deterministic() {
        let a = Operation::new(EventType::Merged, 10, Some(7), "remapped");
        let b = Operation::new(EventType::Merged, 10, Some(7), "remapped again");
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "MERGED:10:7");
    }

    #[test]
    fn test_operation_id_without_destination() {
        let op = Operation::new(EventType::Deprecated, 42, None, "orphaned");
        assert_eq!(op.id, "DEPRECATED:42");
    }

    #[test]
    fn test_snapshot_roundtrip() {
        use crate::core::types::VariantType;

        let rs = ClusteredVariant::new(10, "GCA_1", "1", 1000, VariantType::Snv);
        let op = Operation::new(EventType::Merged, 10, Some(7), "collision")
            .with_clustered_snapshot(rs.clone());

        let json = serde_json::to_string(&op).unwrap();
        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.inactive_clustered, vec![rs]);
        assert!(back.inactive_submitted.is_empty());
    }
}
