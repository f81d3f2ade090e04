//! The accession report writer.
//!
//! Output is written in two phases so that an interrupted job can resume
//! without duplicating the header: body rows go to a scratch file first; at
//! close time the header is written to the real output exactly once (guarded
//! by the persisted job state) and the scratch content is appended after it.
//!
//! Rows are sorted by (output contig name, position, reference allele,
//! alternate allele, accession) — a total order, so repeated runs over the
//! same input produce byte-identical output.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::contig::synonyms::{ContigSynonymTable, SynonymError};
use crate::core::submitted::SubmittedVariant;
use crate::core::types::{Accession, ContigNaming};
use crate::report::denormalize::denormalize;
use crate::report::sequence::FastaSequenceReader;
use crate::report::state::{JobState, ReportPhase};
use crate::report::symbolic::to_symbolic;
use crate::report::ReportError;

/// Prefix rendered before submitted-variant accessions in the ID column
pub const ACCESSION_PREFIX: &str = "ss";

const MISSING_VALUE: &str = ".";

/// An input variant as the caller supplied it, before contig replacement.
///
/// `contig` is the INSDC name the registry stores; `original_chromosomes`
/// are the names recorded by each of the variant's source entries before
/// replacement. A consistent variant records exactly one distinct original
/// name.
#[derive(Debug, Clone)]
pub struct OriginalVariant {
    pub contig: String,
    pub original_chromosomes: Vec<String>,
}

impl OriginalVariant {
    pub fn new(contig: impl Into<String>, original_chromosome: impl Into<String>) -> Self {
        Self {
            contig: contig.into(),
            original_chromosomes: vec![original_chromosome.into()],
        }
    }

    /// The single original chromosome this variant came from
    ///
    /// # Errors
    ///
    /// Returns `ReportError::AmbiguousOriginalChromosome` when the source
    /// entries disagree — fatal for this record.
    pub fn original_chromosome(&self) -> Result<&str, ReportError> {
        let mut distinct: Vec<&str> = self
            .original_chromosomes
            .iter()
            .map(String::as_str)
            .collect();
        distinct.sort_unstable();
        distinct.dedup();
        match distinct.as_slice() {
            [single] => Ok(single),
            _ => Err(ReportError::AmbiguousOriginalChromosome {
                contig: self.contig.clone(),
                candidates: distinct.iter().map(ToString::to_string).collect(),
            }),
        }
    }
}

/// A submitted variant paired with its assigned accession
#[derive(Debug, Clone)]
pub struct AccessionedVariant {
    pub accession: Accession,
    pub variant: SubmittedVariant,
}

/// Two-phase, resumable writer for the accession report
pub struct AccessionReportWriter<'a> {
    output: PathBuf,
    scratch: PathBuf,
    step_id: String,
    naming: ContigNaming,
    table: &'a ContigSynonymTable,
    fasta: &'a FastaSequenceReader,
    scratch_writer: Option<BufWriter<File>>,

    /// Contigs already warned about, so each is reported once per run
    logged_unreplaceable: HashSet<String>,

    /// INSDC contig -> original chromosome, learned from the input variants
    insdc_to_original: HashMap<String, String>,

    /// Output contig name -> INSDC contig, for the header lines
    header_contigs: BTreeMap<String, String>,
}

impl<'a> AccessionReportWriter<'a> {
    pub fn new(
        output: &Path,
        job_id: &str,
        naming: ContigNaming,
        table: &'a ContigSynonymTable,
        fasta: &'a FastaSequenceReader,
    ) -> Self {
        let mut scratch = output.as_os_str().to_owned();
        scratch.push(".tmp");
        Self {
            output: output.to_path_buf(),
            scratch: PathBuf::from(scratch),
            step_id: format!("{job_id}/accession-report"),
            naming,
            table,
            fasta,
            scratch_writer: None,
            logged_unreplaceable: HashSet::new(),
            insdc_to_original: HashMap::new(),
            header_contigs: BTreeMap::new(),
        }
    }

    /// Open the scratch file for appending.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the scratch file cannot be opened.
    pub fn open(&mut self, state: &JobState) -> Result<(), ReportError> {
        let phase = state.phase(&self.step_id);
        if (self.output.exists() || self.scratch.exists()) && phase == ReportPhase::NotStarted {
            warn!(
                "According to the job state, the accession report should not exist, but it \
                 does. The writer will append to it, which may leave two non-contiguous \
                 header sections if the state file was lost."
            );
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.scratch)?;
        self.scratch_writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Denormalize, sort and append one chunk of variants to the scratch file.
    ///
    /// # Errors
    ///
    /// Propagates denormalization and consistency errors: a single bad
    /// record fails the whole report, since a silently-incomplete report is
    /// worse than a failed job.
    pub fn write(
        &mut self,
        original_variants: &[OriginalVariant],
        accessioned_variants: &[AccessionedVariant],
    ) -> Result<(), ReportError> {
        if self.scratch_writer.is_none() {
            return Err(ReportError::NotOpened(
                self.output.display().to_string(),
            ));
        }
        self.update_chromosome_mappings(original_variants)?;

        let mut rows = Vec::with_capacity(accessioned_variants.len());
        for accessioned in accessioned_variants {
            let denormalized = denormalize(&accessioned.variant, self.fasta)?;
            let printable = to_symbolic(&denormalized)?;
            let contig = self.output_contig(&printable.contig);
            self.header_contigs
                .insert(contig.clone(), printable.contig.clone());
            rows.push((
                contig,
                printable.start,
                printable.reference_allele,
                printable.alternate_allele,
                accessioned.accession,
            ));
        }
        rows.sort();

        let writer = self.scratch_writer.as_mut().expect("checked above");
        for (contig, start, reference, alternate, accession) in rows {
            writeln!(
                writer,
                "{contig}\t{start}\t{ACCESSION_PREFIX}{accession}\t{reference}\t{alternate}\t\
                 {MISSING_VALUE}\t{MISSING_VALUE}\t{MISSING_VALUE}"
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the header (once) and move the scratch content into the output.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` on file errors, or `ReportError::State` if
    /// the job state cannot be persisted.
    pub fn close(&mut self, state: &mut JobState) -> Result<(), ReportError> {
        if let Some(mut writer) = self.scratch_writer.take() {
            writer.flush()?;
        }

        let mut output = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)?;

        if state.phase(&self.step_id) == ReportPhase::NotStarted {
            self.write_header(&mut output)?;
            state.advance(&self.step_id, ReportPhase::HeaderWritten)?;
        }

        let mut body = String::new();
        File::open(&self.scratch)?.read_to_string(&mut body)?;
        output.write_all(body.as_bytes())?;
        output.flush()?;
        std::fs::remove_file(&self.scratch)?;

        state.advance(&self.step_id, ReportPhase::Complete)?;
        Ok(())
    }

    fn write_header(&self, output: &mut File) -> Result<(), ReportError> {
        writeln!(output, "##fileformat=VCFv4.2")?;
        for (contig, insdc) in &self.header_contigs {
            writeln!(output, "##contig=<ID={contig},Description=\"{insdc}\">")?;
        }
        writeln!(output, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO")?;
        Ok(())
    }

    fn update_chromosome_mappings(
        &mut self,
        original_variants: &[OriginalVariant],
    ) -> Result<(), ReportError> {
        for variant in original_variants {
            let original = variant.original_chromosome()?.to_string();
            if let Some(previous) = self
                .insdc_to_original
                .insert(variant.contig.clone(), original.clone())
            {
                if previous != original {
                    warn!(
                        "Contig '{}' is associated with several original chromosomes \
                         ('{}', '{}'); the report will use the most recent one",
                        variant.contig, previous, original
                    );
                }
            }
        }
        Ok(())
    }

    /// The name a contig should carry in the output.
    ///
    /// The stored INSDC name is first mapped back to the chromosome the
    /// caller originally supplied, then replaced with the requested naming
    /// standard. Unresolvable or unsafe replacements fall back to the
    /// original name, each warned about at most once per run.
    fn output_contig(&mut self, insdc_contig: &str) -> String {
        let original = self
            .insdc_to_original
            .get(insdc_contig)
            .cloned()
            .unwrap_or_else(|| insdc_contig.to_string());

        match self.table.synonym_for(&original, self.naming) {
            Ok(replacement) => replacement.to_string(),
            Err(error) => {
                if self.logged_unreplaceable.insert(original.clone()) {
                    match error {
                        SynonymError::UnknownContig(_) => warn!(
                            "Will not replace contig '{original}' (in the current variant or \
                             any subsequent one): no synonyms available. (Hint: is the \
                             assembly report correct and complete?)"
                        ),
                        SynonymError::NoSynonym { .. } => warn!(
                            "Will not replace contig '{original}' (in the current variant or \
                             any subsequent one): no {} synonym for it",
                            self.naming
                        ),
                        SynonymError::NonIdenticalSequences { ref replacement, .. } => warn!(
                            "Will not replace contig '{original}' with '{replacement}': the \
                             contigs are not identical according to the assembly report"
                        ),
                    }
                }
                original
            }
        }
    }
}
