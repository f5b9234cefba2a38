//! Output interval type and coordinate conversion.

use std::fmt;

/// Convert 1-based inclusive GFF coordinates to 0-based BED coordinates,
/// padded by `flank` bases on both sides.
///
/// Coordinates are signed: a flank reaching past the sequence start gives a
/// negative start, which is written as is.
#[inline]
pub fn to_bed_coords(start: i64, end: i64, flank: u64) -> (i64, i64) {
    let flank = i64::try_from(flank).unwrap_or(i64::MAX);
    let bed_start = start.saturating_sub(1).saturating_sub(flank);
    let bed_end = end.saturating_add(flank);
    (bed_start, bed_end)
}

/// Extra columns written in exon-detail mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonDetail<'a> {
    pub gene_name: &'a str,
    pub exon_number: &'a str,
}

/// A coding interval ready to be written as one BED line.
/// Uses 0-based starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdsInterval<'a> {
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
    pub transcript_id: &'a str,
    pub exon: Option<ExonDetail<'a>>,
}

impl<'a> CdsInterval<'a> {
    /// Build from GFF coordinates.
    pub fn from_gff(
        chrom: &'a str,
        gff_start: i64,
        gff_end: i64,
        flank: u64,
        transcript_id: &'a str,
    ) -> Self {
        let (start, end) = to_bed_coords(gff_start, gff_end, flank);
        Self {
            chrom,
            start,
            end,
            transcript_id,
            exon: None,
        }
    }

    pub fn with_exon(mut self, gene_name: &'a str, exon_number: &'a str) -> Self {
        self.exon = Some(ExonDetail {
            gene_name,
            exon_number,
        });
        self
    }
}

impl fmt::Display for CdsInterval<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t", self.chrom, self.start, self.end)?;
        match &self.exon {
            Some(exon) => write!(
                f,
                "{}\t{}\t{}",
                exon.gene_name, self.transcript_id, exon.exon_number
            ),
            None => write!(f, "{}", self.transcript_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bed_coords() {
        assert_eq!(to_bed_coords(100, 200, 0), (99, 200));
        assert_eq!(to_bed_coords(100, 200, 5), (94, 205));
        assert_eq!(to_bed_coords(1, 1, 0), (0, 1));
    }

    #[test]
    fn test_to_bed_coords_formula() {
        for flank in [0u64, 1, 7, 50, 1000] {
            let (start, end) = to_bed_coords(5000, 6000, flank);
            assert_eq!(start, 5000 - 1 - flank as i64);
            assert_eq!(end, 6000 + flank as i64);
        }
    }

    #[test]
    fn test_to_bed_coords_negative_start() {
        assert_eq!(to_bed_coords(3, 10, 10), (-8, 20));
        assert_eq!(to_bed_coords(1, 10, 1), (-1, 11));
        assert_eq!(to_bed_coords(0, 10, 0), (-1, 10));
        // Start after end is passed through unchanged.
        assert_eq!(to_bed_coords(20, 10, 0), (19, 10));
    }

    #[test]
    fn test_display_transcript() {
        let iv = CdsInterval::from_gff("1", 100, 200, 0, "NM_000001");
        assert_eq!(iv.to_string(), "1\t99\t200\tNM_000001");
    }

    #[test]
    fn test_display_negative_start() {
        let iv = CdsInterval::from_gff("1", 3, 10, 10, "NM_1");
        assert_eq!(iv.to_string(), "1\t-8\t20\tNM_1");
    }

    #[test]
    fn test_display_exon() {
        let iv = CdsInterval::from_gff("1", 100, 200, 0, "NM_000001").with_exon("GENE1", "2");
        assert_eq!(iv.to_string(), "1\t99\t200\tGENE1\tNM_000001\t2");
    }
}
