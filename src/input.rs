//! Input source resolution.
//!
//! A path ending in `.gz` is decompressed on the fly, `-` reads stdin, and
//! anything else is opened as plain text. Callers get a single buffered byte
//! stream either way.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::gff::{GffError, Result};

/// Default input buffer size (256 KB).
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default line buffer capacity (1 KB).
/// GFF attribute columns are rarely longer.
pub const DEFAULT_LINE_BUFFER: usize = 1024;

/// Path that selects standard input.
const STDIN_ARG: &str = "-";

/// File name suffix of gzip-compressed input.
const GZIP_SUFFIX: &str = ".gz";

/// Compression of an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Detect compression from the file name.
    pub fn from_path(path: &Path) -> Self {
        let is_gzip = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(GZIP_SUFFIX))
            .unwrap_or(false);
        if is_gzip {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }
}

/// Whether the path selects standard input.
#[inline]
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_ARG
}

/// Open a path as a buffered byte stream, decompressing if needed.
pub fn open<P: Into<PathBuf>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.into();
    if is_stdin(&path) {
        log::debug!("Reading from stdin");
        return Ok(Box::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER,
            io::stdin(),
        )));
    }

    let file = File::open(&path).map_err(|source| GffError::Open {
        path: path.clone(),
        source,
    })?;
    let compression = Compression::from_path(&path);
    log::debug!(
        "Opened {} (compression: {})",
        path.display(),
        compression.name()
    );

    let reader: Box<dyn BufRead> = match compression {
        Compression::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER,
            MultiGzDecoder::new(file),
        )),
        Compression::None => Box::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER, file)),
    };
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_compression_from_path() {
        assert_eq!(
            Compression::from_path(Path::new("refseq.gff.gz")),
            Compression::Gzip
        );
        assert_eq!(
            Compression::from_path(Path::new("/data/refseq.gff")),
            Compression::None
        );
        // Only a true suffix counts.
        assert_eq!(
            Compression::from_path(Path::new("refseq.gz.gff")),
            Compression::None
        );
        assert_eq!(
            Compression::from_path(Path::new("/data.gz/refseq.gff")),
            Compression::None
        );
    }

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("./-")));
        assert!(!is_stdin(Path::new("in.gff")));
    }

    #[test]
    fn test_open_plain() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "line1\nline2\n").unwrap();
        file.flush().unwrap();

        let mut content = String::new();
        open(file.path()).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "line1\nline2\n");
    }

    #[test]
    fn test_open_gzip() {
        let file = tempfile::Builder::new().suffix(".gff.gz").tempfile().unwrap();
        {
            let mut encoder = GzEncoder::new(file.reopen().unwrap(), flate2::Compression::default());
            encoder.write_all(b"line1\nline2\n").unwrap();
            encoder.finish().unwrap();
        }

        let mut content = String::new();
        open(file.path()).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "line1\nline2\n");
    }

    #[test]
    fn test_open_corrupt_gzip_fails_on_read() {
        let mut file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        writeln!(file, "not gzip at all").unwrap();
        file.flush().unwrap();

        let mut content = String::new();
        let result = open(file.path()).unwrap().read_to_string(&mut content);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = open("/nonexistent/path/refseq.gff").err().unwrap();
        assert!(matches!(err, GffError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/path/refseq.gff"));
    }
}
