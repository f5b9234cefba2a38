//! Streaming GFF line reader and record parser.

use memchr::memchr_iter;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;

use crate::input::{self, DEFAULT_LINE_BUFFER};

/// Number of tab-separated columns in a GFF line.
pub const GFF_FIELD_COUNT: usize = 9;

/// Sequence name prefix removed during normalization.
const CHR_PREFIX: &str = "chr";

/// Separator between attribute pairs.
const ATTRIBUTE_SEPARATOR: &str = "; ";

/// Errors that can occur while converting GFF input.
#[derive(Error, Debug)]
pub enum GffError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Flank must be an integer >= 0, got '{0}'")]
    InvalidFlank(String),

    #[error("Line {line} is not valid UTF-8")]
    Encoding { line: usize },

    #[error("Line {line}: expected 9 tab-separated fields, got {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line}: attribute '{pair}' has no key/value separator")]
    InvalidAttribute { line: usize, pair: String },

    #[error("Line {line}: required attribute '{key}' not found")]
    MissingAttribute { line: usize, key: &'static str },
}

impl GffError {
    /// Whether the error describes a single bad input record, as opposed to
    /// a failure of the run itself.
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            GffError::Encoding { .. }
                | GffError::FieldCount { .. }
                | GffError::Parse { .. }
                | GffError::InvalidAttribute { .. }
                | GffError::MissingAttribute { .. }
        )
    }
}

impl GffError {
    /// Whether the error is the downstream reader closing the output pipe.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, GffError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

pub type Result<T> = std::result::Result<T, GffError>;

/// Streaming line reader over a GFF source.
///
/// Lines are read as raw bytes and decoded to UTF-8 in one place, whether the
/// source was compressed or not.
pub struct GffReader<R: BufRead> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
}

impl GffReader<Box<dyn BufRead>> {
    /// Open a GFF file (plain or gzip) or `-` for stdin.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let reader = input::open(path)?;
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> GffReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::with_capacity(DEFAULT_LINE_BUFFER),
        }
    }

    /// Read the next line with trailing line terminators and `;`/space runs
    /// removed, along with its 1-based line number. Returns `Ok(None)` at end
    /// of input.
    pub fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let line = std::str::from_utf8(&self.buffer).map_err(|_| GffError::Encoding {
            line: self.line_number,
        })?;
        Ok(Some((self.line_number, trim_line(line))))
    }
}

/// Strip line terminators, then any trailing run of `;` and space characters.
#[inline]
pub fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
        .trim_end_matches([';', ' '])
}

/// Check if a line carries no feature (blank, comment, or `##` directive).
#[inline]
pub fn should_skip_line(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with('#')
}

/// Remove a single leading `chr` from a sequence name.
#[inline]
pub fn strip_chr_prefix(seqname: &str) -> &str {
    seqname.strip_prefix(CHR_PREFIX).unwrap_or(seqname)
}

/// One GFF line split into its nine columns.
///
/// All fields borrow from the line buffer; the record lives only as long as
/// the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffRecord<'a> {
    /// Sequence name with any leading `chr` removed.
    pub seqname: &'a str,
    pub source: &'a str,
    pub feature_type: &'a str,
    /// 1-based, inclusive.
    pub start: i64,
    /// 1-based, inclusive.
    pub end: i64,
    pub score: &'a str,
    pub strand: &'a str,
    pub frame: &'a str,
    pub attributes: &'a str,
}

impl<'a> GffRecord<'a> {
    /// Parse a trimmed GFF line.
    pub fn parse(line: &'a str, line_number: usize) -> Result<Self> {
        let mut fields = [""; GFF_FIELD_COUNT];
        let mut found = 0;
        let mut field_start = 0;
        for tab in memchr_iter(b'\t', line.as_bytes()).chain(std::iter::once(line.len())) {
            if found < GFF_FIELD_COUNT {
                fields[found] = &line[field_start..tab];
            }
            found += 1;
            field_start = tab + 1;
        }
        if found != GFF_FIELD_COUNT {
            return Err(GffError::FieldCount {
                line: line_number,
                found,
            });
        }

        let start = parse_position(fields[3], "start", line_number)?;
        let end = parse_position(fields[4], "end", line_number)?;

        Ok(Self {
            seqname: strip_chr_prefix(fields[0]),
            source: fields[1],
            feature_type: fields[2],
            start,
            end,
            score: fields[5],
            strand: fields[6],
            frame: fields[7],
            attributes: fields[8],
        })
    }
}

fn parse_position(s: &str, field_name: &str, line_number: usize) -> Result<i64> {
    s.parse().map_err(|_| GffError::Parse {
        line: line_number,
        message: format!("Invalid {} position: '{}'", field_name, s),
    })
}

/// Attribute key/value pairs of one record.
///
/// Values have every `"` removed. When a key repeats, the last value wins.
#[derive(Debug, Default)]
pub struct Attributes<'a> {
    pairs: FxHashMap<&'a str, Cow<'a, str>>,
}

impl<'a> Attributes<'a> {
    /// Parse the attribute column, e.g. `gene_id "G1"; transcript_id "NM_1"`.
    pub fn parse(column: &'a str, line_number: usize) -> Result<Self> {
        let mut pairs = FxHashMap::default();
        for pair in column.split(ATTRIBUTE_SEPARATOR) {
            let (key, value) = pair
                .split_once(' ')
                .ok_or_else(|| GffError::InvalidAttribute {
                    line: line_number,
                    pair: pair.to_string(),
                })?;
            let value = if value.contains('"') {
                Cow::Owned(value.replace('"', ""))
            } else {
                Cow::Borrowed(value)
            };
            pairs.insert(key, value);
        }
        Ok(Self { pairs })
    }

    /// Look up a value by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(|v| v.as_ref())
    }

    /// Look up a value that must be present.
    pub fn require(&self, key: &'static str, line_number: usize) -> Result<&str> {
        self.get(key).ok_or(GffError::MissingAttribute {
            line: line_number,
            key,
        })
    }
}
