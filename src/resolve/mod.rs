//! Identity resolution: merge, split and deprecation of clustered variants.
//!
//! Resolution runs in two stages, mirroring the clustering pipeline this
//! registry serves. A detection pass scans the registry and records
//! candidate events (`RS_MERGE_CANDIDATES`, `RS_SPLIT_CANDIDATES`) in the
//! operation history; the resolvers then consume those events and apply the
//! actual merges and splits. Every application step is idempotent so an
//! interrupted chunk can be reprocessed safely.

pub mod candidates;
pub mod deprecate;
pub mod merge;
pub mod policy;
pub mod split;

pub use candidates::{detect_merge_candidates, detect_split_candidates};
pub use deprecate::deprecate_orphans;
pub use merge::{apply_merge, resolve_merge, MergeError};
pub use policy::{distinct_by_key, prioritise, Prioritised};
pub use split::{apply_split, resolve_split, SplitAssignment, SplitError};
