//! The merging prioritization policy: which of two accessions survives.

use std::collections::HashSet;
use std::hash::Hash;

use crate::core::types::Accession;

/// Outcome of prioritizing two accessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prioritised {
    /// The accession authoritative to retain
    pub keep: Accession,
    /// The accession to merge into the kept one
    pub merge: Accession,
}

/// Decide which of two accessions is authoritative to retain.
///
/// The numerically smaller accession wins: earlier-assigned identifiers are
/// kept. This is a total order, so folding any permutation of a candidate
/// list yields the same survivor. Equal accessions are allowed and return
/// that accession as both sides — merging an accession into itself is a
/// no-op, not an error.
#[must_use]
pub fn prioritise(a: Accession, b: Accession) -> Prioritised {
    if a <= b {
        Prioritised { keep: a, merge: b }
    } else {
        Prioritised { keep: b, merge: a }
    }
}

/// Keep the first occurrence of each key, preserving input order.
///
/// Candidate lists are deduplicated by accession rather than full-record
/// equality, because two in-memory representations of the same clustered
/// variant may differ in fields not tied to identity.
pub fn distinct_by_key<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smaller_accession_wins() {
        assert_eq!(prioritise(10, 7), Prioritised { keep: 7, merge: 10 });
        assert_eq!(prioritise(7, 10), Prioritised { keep: 7, merge: 10 });
    }

    #[test]
    fn test_symmetric_keep() {
        // prioritise(a, b) and prioritise(b, a) agree on the survivor
        for (a, b) in [(1u64, 2u64), (500, 3), (42, 42), (u64::MAX, 0)] {
            assert_eq!(prioritise(a, b).keep, prioritise(b, a).keep);
        }
    }

    #[test]
    fn test_equal_accessions_guarded() {
        assert_eq!(prioritise(5, 5), Prioritised { keep: 5, merge: 5 });
    }

    #[test]
    fn test_fold_is_permutation_independent() {
        let fold = |accessions: &[Accession]| {
            accessions
                .iter()
                .copied()
                .reduce(|best, next| prioritise(best, next).keep)
                .unwrap()
        };

        assert_eq!(fold(&[10, 7, 42]), 7);
        assert_eq!(fold(&[42, 10, 7]), 7);
        assert_eq!(fold(&[7, 42, 10]), 7);
    }

    #[test]
    fn test_distinct_by_key_keeps_first_occurrence() {
        let items = vec![(10u64, "a"), (7, "b"), (10, "c"), (7, "d")];
        let distinct = distinct_by_key(items, |item| item.0);
        assert_eq!(distinct, vec![(10, "a"), (7, "b")]);
    }
}
