//! Command implementations for refseq-cds-bed.

pub mod gff_to_bed;

pub use gff_to_bed::{ConvertStats, GffToBedCommand, LineOutcome};
