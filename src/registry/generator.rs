use thiserror::Error;

use crate::core::types::Accession;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccessionGenerationError {
    #[error("accession space exhausted at {0}")]
    Exhausted(Accession),
}

/// Hands out new accessions, monotonically increasing and never reused.
///
/// Resolvers request accessions one at a time or in blocks; a failed block
/// request leaves the generator untouched so the whole merge/split for that
/// locus can be retried.
#[derive(Debug, Clone)]
pub struct MonotonicAccessionGenerator {
    next: Accession,
}

impl MonotonicAccessionGenerator {
    #[must_use]
    pub fn new(next: Accession) -> Self {
        Self { next }
    }

    /// The next accession that would be handed out
    #[must_use]
    pub fn peek(&self) -> Accession {
        self.next
    }

    /// Generate a single new accession
    ///
    /// # Errors
    ///
    /// Returns `AccessionGenerationError::Exhausted` if the accession space
    /// has run out.
    pub fn generate(&mut self) -> Result<Accession, AccessionGenerationError> {
        let accession = self.next;
        self.next = self
            .next
            .checked_add(1)
            .ok_or(AccessionGenerationError::Exhausted(accession))?;
        Ok(accession)
    }

    /// Generate a contiguous block of `count` accessions, all-or-nothing
    ///
    /// # Errors
    ///
    /// Returns `AccessionGenerationError::Exhausted` if the block does not
    /// fit; no accession is consumed in that case.
    pub fn generate_block(
        &mut self,
        count: u64,
    ) -> Result<Vec<Accession>, AccessionGenerationError> {
        let end = self
            .next
            .checked_add(count)
            .ok_or(AccessionGenerationError::Exhausted(self.next))?;
        let block = (self.next..end).collect();
        self.next = end;
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_never_reused() {
        let mut generator = MonotonicAccessionGenerator::new(100);
        assert_eq!(generator.generate().unwrap(), 100);
        assert_eq!(generator.generate().unwrap(), 101);
        assert_eq!(generator.generate_block(3).unwrap(), vec![102, 103, 104]);
        assert_eq!(generator.peek(), 105);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut generator = MonotonicAccessionGenerator::new(u64::MAX);
        assert!(generator.generate().is_err());
    }

    #[test]
    fn test_failed_block_leaves_generator_untouched() {
        let mut generator = MonotonicAccessionGenerator::new(u64::MAX - 1);
        assert!(generator.generate_block(5).is_err());
        assert_eq!(generator.peek(), u64::MAX - 1);
        assert_eq!(generator.generate().unwrap(), u64::MAX - 1);
    }
}
