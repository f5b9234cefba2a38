//! Buffered BED output.
//!
//! Uses itoa for coordinate formatting to avoid allocation in the hot path.

use crate::gff::GffError;
use crate::interval::CdsInterval;
use std::io::{BufWriter, Write};

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Tab-delimited BED writer.
pub struct BedWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> BedWriter<W> {
    /// Create a new BedWriter with the default 2MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write chrom, start, end without a line terminator.
    #[inline]
    fn write_bed3(&mut self, chrom: &str, start: i64, end: i64) -> Result<(), GffError> {
        self.writer.write_all(chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(end).as_bytes())?;
        Ok(())
    }

    #[inline]
    fn write_field(&mut self, value: &str) -> Result<(), GffError> {
        self.writer.write_all(b"\t")?;
        self.writer.write_all(value.as_bytes())?;
        Ok(())
    }

    /// Write one interval as a 4-column line, or 6 columns if it carries
    /// exon detail.
    #[inline]
    pub fn write_interval(&mut self, interval: &CdsInterval<'_>) -> Result<(), GffError> {
        self.write_bed3(interval.chrom, interval.start, interval.end)?;
        match &interval.exon {
            Some(exon) => {
                self.write_field(exon.gene_name)?;
                self.write_field(interval.transcript_id)?;
                self.write_field(exon.exon_number)?;
            }
            None => self.write_field(interval.transcript_id)?,
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), GffError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_transcript_line() {
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::new(&mut output);
            let iv = CdsInterval::from_gff("1", 100, 200, 0, "NM_000001");
            writer.write_interval(&iv).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"1\t99\t200\tNM_000001\n");
    }

    #[test]
    fn test_write_exon_line() {
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::new(&mut output);
            let iv = CdsInterval::from_gff("X", 100, 200, 5, "NM_000001").with_exon("GENE1", "2");
            writer.write_interval(&iv).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"X\t94\t205\tGENE1\tNM_000001\t2\n");
    }

    #[test]
    fn test_write_negative_start() {
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::new(&mut output);
            let iv = CdsInterval::from_gff("1", 3, 10, 10, "NM_1");
            writer.write_interval(&iv).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"1\t-8\t20\tNM_1\n");
    }

    #[test]
    fn test_writer_matches_display() {
        let iv = CdsInterval::from_gff("MT", 3307, 4262, 10, "NM_012345").with_exon("ND1", "1");
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::with_capacity(64, &mut output);
            writer.write_interval(&iv).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(String::from_utf8(output).unwrap(), format!("{}\n", iv));
    }
}
