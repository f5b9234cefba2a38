//! Run configuration for a conversion pass.
//!
//! Everything here is fixed once before the first line is read and never
//! changes during the pass.

use crate::gff::GffError;

/// How a record that cannot be parsed, or lacks an attribute needed for
/// output, is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort the whole run on the first malformed record.
    Fatal,
    /// Report the record on stderr and continue with the next line.
    Skip,
}

/// Policy used unless the caller asks otherwise.
pub const DEFAULT_MALFORMED_POLICY: MalformedPolicy = MalformedPolicy::Fatal;

impl Default for MalformedPolicy {
    fn default() -> Self {
        DEFAULT_MALFORMED_POLICY
    }
}

/// Columns written for each qualifying record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// chrom, start, end, transcript_id
    #[default]
    Transcript,
    /// chrom, start, end, gene_name, transcript_id, exon_number
    Exon,
}

impl OutputMode {
    pub fn from_create_exon(create_exon: bool) -> Self {
        if create_exon {
            OutputMode::Exon
        } else {
            OutputMode::Transcript
        }
    }

    /// Number of tab-separated columns per output line.
    pub fn column_count(&self) -> usize {
        match self {
            OutputMode::Transcript => 4,
            OutputMode::Exon => 6,
        }
    }
}

/// Parse a flank width from the command line.
///
/// Accepts only non-negative integers.
pub fn parse_flank(s: &str) -> Result<u64, GffError> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| GffError::InvalidFlank(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_fatal() {
        assert_eq!(MalformedPolicy::default(), MalformedPolicy::Fatal);
        assert_eq!(DEFAULT_MALFORMED_POLICY, MalformedPolicy::Fatal);
    }

    #[test]
    fn test_output_mode() {
        assert_eq!(OutputMode::from_create_exon(false), OutputMode::Transcript);
        assert_eq!(OutputMode::from_create_exon(true), OutputMode::Exon);
        assert_eq!(OutputMode::default().column_count(), 4);
        assert_eq!(OutputMode::Exon.column_count(), 6);
    }

    #[test]
    fn test_parse_flank() {
        assert_eq!(parse_flank("0").unwrap(), 0);
        assert_eq!(parse_flank("25").unwrap(), 25);
        assert!(matches!(parse_flank("-1"), Err(GffError::InvalidFlank(_))));
        assert!(parse_flank("1.5").is_err());
        assert!(parse_flank("ten").is_err());
        assert!(parse_flank("").is_err());
    }

    #[test]
    fn test_flank_error_message() {
        let err = parse_flank("-1").unwrap_err();
        assert_eq!(err.to_string(), "Flank must be an integer >= 0, got '-1'");
    }
}
