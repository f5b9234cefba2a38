//! gff2bed: RefSeq GFF to CDS BED converter
//!
//! Usage: gff2bed [OPTIONS] <GFF> [FLANK]
//!
//! Pipe the output into `sort -k1V -k2n -k3n -k4` for a sorted BED.

use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;
use std::process;

use refseq_cds_bed::config::parse_flank;
use refseq_cds_bed::{
    GffError, GffToBedCommand, MalformedPolicy, OutputMode, DEFAULT_MALFORMED_POLICY,
};

#[derive(Parser)]
#[command(name = "gff2bed")]
#[command(version)]
#[command(about = "Convert a RefSeq GFF file to a BED file of NM_ protein-coding CDS regions", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Input GFF file, optionally gzip-compressed (.gz), or - for stdin
    gff: PathBuf,

    /// Number of flanking bases added to both ends of each region
    #[arg(default_value = "0", value_parser = parse_flank)]
    flank: u64,

    /// Write gene name, transcript ID and exon number instead of transcript ID only
    #[arg(short = 'e', long = "create_exon")]
    create_exon: bool,

    /// Skip malformed lines with a warning instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Print conversion statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => {}
        // Downstream stopped reading (e.g. `| head`); not a failure.
        Err(e) if e.is_broken_pipe() => log::debug!("Output closed early: {}", e),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), GffError> {
    let policy = if cli.skip_malformed {
        MalformedPolicy::Skip
    } else {
        DEFAULT_MALFORMED_POLICY
    };

    let cmd = GffToBedCommand::new()
        .with_flank(cli.flank)
        .with_mode(OutputMode::from_create_exon(cli.create_exon))
        .with_policy(policy);
    log::info!(
        "Converting {} (flank={}, mode={:?}, malformed={:?})",
        cli.gff.display(),
        cmd.flank,
        cmd.mode,
        cmd.policy
    );

    let stdout = io::stdout();
    let handle = stdout.lock();
    let stats = cmd.run(&cli.gff, handle)?;

    if cli.stats {
        eprintln!("gff2bed stats: {}", stats);
    }

    Ok(())
}
