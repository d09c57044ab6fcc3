//! `info` command: summarise the records of a patch

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use ips_patch::fs::read_source;
use ips_patch::{FormatError, PatchRecord, PatchRecordReader};

use crate::utils::{format_bytes, format_offset, record_table};

/// Every record of a patch plus what follows its EOF marker
#[derive(Debug)]
pub struct PatchInspection {
    /// Data records in stream order
    pub records: Vec<PatchRecord>,
    /// Bytes after the EOF marker
    pub trailing_bytes: usize,
}

impl PatchInspection {
    /// Decode an entire patch
    pub fn inspect(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = PatchRecordReader::new(data);
        reader.read_header()?;

        let mut records = reader.records();
        let decoded = records.by_ref().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            records: decoded,
            trailing_bytes: records.reader().remaining(),
        })
    }

    pub fn standard_records(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, PatchRecord::Standard { .. }))
            .count()
    }

    pub fn run_length_records(&self) -> usize {
        self.records.len() - self.standard_records()
    }

    pub fn bytes_written(&self) -> usize {
        self.records.iter().map(PatchRecord::written_len).sum()
    }

    /// Minimum image size the patch produces
    pub fn min_output_len(&self) -> Option<usize> {
        self.records.iter().filter_map(PatchRecord::end).max()
    }
}

pub fn execute(path: PathBuf, list_records: bool) -> Result<()> {
    let data = read_source(&path)?;
    let inspection = PatchInspection::inspect(&data)
        .with_context(|| format!("Failed to parse IPS patch: {}", path.display()))?;

    println!("\n{}", style("IPS Patch Information").bold().underlined());
    println!("File: {}", style(path.display()).cyan());
    println!("Size: {}", style(format_bytes(data.len() as u64)).yellow());
    println!(
        "Records: {} ({} standard, {} rle)",
        style(inspection.records.len()).green(),
        inspection.standard_records(),
        inspection.run_length_records()
    );
    println!(
        "Bytes written: {}",
        style(format_bytes(inspection.bytes_written() as u64)).green()
    );

    match inspection.min_output_len() {
        Some(end) => println!(
            "Highest address: {} (output at least {})",
            style(format_offset(end as u64 - 1)).yellow(),
            format_bytes(end as u64)
        ),
        None => println!("Highest address: {}", style("none").dim()),
    }

    if inspection.trailing_bytes > 0 {
        println!(
            "Trailing data after EOF: {} byte(s) {}",
            style(inspection.trailing_bytes).yellow(),
            style("(ignored)").dim()
        );
    }

    if list_records && !inspection.records.is_empty() {
        println!("\n{}", style("Records").bold());
        record_table(&inspection.records).printstd();
    }

    Ok(())
}
