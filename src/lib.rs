//! Convert RefSeq GFF annotations into BED intervals.
//!
//! Only CDS features of protein-coding transcripts in the curated `NM_`
//! accession namespace are kept. Output is written in input order with
//! 0-based starts; sort it downstream if needed.
//!
//! # Example
//!
//! ```rust,no_run
//! use refseq_cds_bed::{GffToBedCommand, OutputMode};
//!
//! let cmd = GffToBedCommand::new()
//!     .with_flank(10)
//!     .with_mode(OutputMode::Exon);
//! let stats = cmd.run("refseq.gff.gz", std::io::stdout()).unwrap();
//! eprintln!("{}", stats);
//! ```

pub mod commands;
pub mod config;
pub mod gff;
pub mod input;
pub mod interval;
pub mod output;

// Re-export commonly used types
pub use commands::{ConvertStats, GffToBedCommand};
pub use config::{MalformedPolicy, OutputMode, DEFAULT_MALFORMED_POLICY};
pub use gff::{Attributes, GffError, GffReader, GffRecord};
pub use interval::CdsInterval;
pub use output::BedWriter;
