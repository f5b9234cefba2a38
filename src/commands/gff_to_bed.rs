//! GFF to BED conversion.
//!
//! Streams a GFF file line by line and writes one BED line for every CDS
//! feature of a protein-coding `NM_` transcript, in input order. Coordinates
//! are shifted to 0-based starts and padded by a fixed flank.

use crate::config::{MalformedPolicy, OutputMode};
use crate::gff::{should_skip_line, Attributes, GffError, GffReader, GffRecord, Result};
use crate::interval::CdsInterval;
use crate::output::BedWriter;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Feature type kept by the converter.
pub const CDS_TYPE: &str = "CDS";

/// Accepted value of the `transcript_type` attribute.
pub const PROTEIN_CODING: &str = "protein_coding";

/// Accession prefix of curated RefSeq mRNA transcripts.
pub const NM_PREFIX: &str = "NM_";

const TRANSCRIPT_TYPE_KEY: &str = "transcript_type";
const TRANSCRIPT_ID_KEY: &str = "transcript_id";
const GENE_NAME_KEY: &str = "gene_name";
const EXON_NUMBER_KEY: &str = "exon_number";

/// What happened to a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line, comment or directive.
    Comment,
    /// Feature type other than CDS.
    NotCds,
    /// `transcript_type` missing or not protein coding.
    NotProteinCoding,
    /// `transcript_id` missing or outside the `NM_` namespace.
    NotRefSeqMrna,
    /// A BED line was written.
    Emitted,
}

/// Counters collected over one conversion pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConvertStats {
    pub lines_read: usize,
    pub comments: usize,
    pub not_cds: usize,
    pub not_protein_coding: usize,
    pub not_refseq_mrna: usize,
    pub malformed_skipped: usize,
    pub intervals_written: usize,
}

impl ConvertStats {
    fn record(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Comment => self.comments += 1,
            LineOutcome::NotCds => self.not_cds += 1,
            LineOutcome::NotProteinCoding => self.not_protein_coding += 1,
            LineOutcome::NotRefSeqMrna => self.not_refseq_mrna += 1,
            LineOutcome::Emitted => self.intervals_written += 1,
        }
    }
}

impl fmt::Display for ConvertStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines={}, written={}, comments={}, not_cds={}, not_protein_coding={}, not_nm={}, malformed_skipped={}",
            self.lines_read,
            self.intervals_written,
            self.comments,
            self.not_cds,
            self.not_protein_coding,
            self.not_refseq_mrna,
            self.malformed_skipped
        )
    }
}

/// GFF to BED command configuration.
#[derive(Debug, Clone, Default)]
pub struct GffToBedCommand {
    /// Bases added to both ends of every interval.
    pub flank: u64,
    /// Columns written per interval.
    pub mode: OutputMode,
    /// Handling of lines that cannot be converted.
    pub policy: MalformedPolicy,
}

impl GffToBedCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flank(mut self, flank: u64) -> Self {
        self.flank = flank;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the conversion on a file (plain, gzip, or `-` for stdin).
    pub fn run<P: AsRef<Path>, W: Write>(&self, input: P, output: W) -> Result<ConvertStats> {
        let reader = GffReader::from_path(input.as_ref())?;
        self.convert_streaming(reader, output)
    }

    /// Streaming conversion.
    pub fn convert_streaming<R: BufRead, W: Write>(
        &self,
        mut reader: GffReader<R>,
        output: W,
    ) -> Result<ConvertStats> {
        let mut writer = BedWriter::new(output);
        let mut stats = ConvertStats::default();

        loop {
            let (line_number, line) = match reader.next_line() {
                Ok(Some(next)) => next,
                Ok(None) => break,
                Err(e) if e.is_malformed_record() => {
                    stats.lines_read += 1;
                    self.handle_malformed(e, &mut stats)?;
                    continue;
                }
                Err(e) => return Err(e),
            };
            stats.lines_read += 1;

            match self.convert_line(line, line_number, &mut writer) {
                Ok(outcome) => stats.record(outcome),
                Err(e) if e.is_malformed_record() => self.handle_malformed(e, &mut stats)?,
                Err(e) => return Err(e),
            }
        }

        writer.flush()?;
        log::info!("Conversion finished: {}", stats);
        Ok(stats)
    }

    /// Apply the malformed-record policy to a record-level error.
    fn handle_malformed(&self, err: GffError, stats: &mut ConvertStats) -> Result<()> {
        match self.policy {
            MalformedPolicy::Fatal => Err(err),
            MalformedPolicy::Skip => {
                log::warn!("Skipping malformed record: {}", err);
                stats.malformed_skipped += 1;
                Ok(())
            }
        }
    }

    /// Process one trimmed line, writing at most one BED line.
    pub fn convert_line<W: Write>(
        &self,
        line: &str,
        line_number: usize,
        writer: &mut BedWriter<W>,
    ) -> Result<LineOutcome> {
        if should_skip_line(line) {
            return Ok(LineOutcome::Comment);
        }

        let record = GffRecord::parse(line, line_number)?;
        if record.feature_type != CDS_TYPE {
            return Ok(LineOutcome::NotCds);
        }

        let attributes = Attributes::parse(record.attributes, line_number)?;

        match attributes.get(TRANSCRIPT_TYPE_KEY) {
            Some(PROTEIN_CODING) => {}
            Some(_) => return Ok(LineOutcome::NotProteinCoding),
            None => {
                log::debug!("Line {}: no {} attribute", line_number, TRANSCRIPT_TYPE_KEY);
                return Ok(LineOutcome::NotProteinCoding);
            }
        }

        let transcript_id = match attributes.get(TRANSCRIPT_ID_KEY) {
            Some(id) if id.starts_with(NM_PREFIX) => id,
            Some(_) => return Ok(LineOutcome::NotRefSeqMrna),
            None => {
                log::debug!("Line {}: no {} attribute", line_number, TRANSCRIPT_ID_KEY);
                return Ok(LineOutcome::NotRefSeqMrna);
            }
        };

        let mut interval = CdsInterval::from_gff(
            record.seqname,
            record.start,
            record.end,
            self.flank,
            transcript_id,
        );
        if self.mode == OutputMode::Exon {
            let gene_name = attributes.require(GENE_NAME_KEY, line_number)?;
            let exon_number = attributes.require(EXON_NUMBER_KEY, line_number)?;
            interval = interval.with_exon(gene_name, exon_number);
        }

        log::trace!("Line {}: {}", line_number, interval);
        writer.write_interval(&interval)?;
        Ok(LineOutcome::Emitted)
    }
}
