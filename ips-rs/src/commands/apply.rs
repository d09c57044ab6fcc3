//! `apply` command: patch a ROM and write the result

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use ips_patch::ApplyReport;
use ips_patch::fs::{apply_file, output_path_with_marker, read_source};

use crate::utils::{format_bytes, format_growth};

pub fn execute(
    rom: PathBuf,
    patch: PathBuf,
    output: Option<PathBuf>,
    marker: String,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    if dry_run {
        return execute_dry_run(rom, patch, quiet);
    }

    let output = output.unwrap_or_else(|| output_path_with_marker(&rom, &marker));

    let applied = apply_file(&rom, &patch, Some(&output)).with_context(|| {
        format!(
            "Failed to apply {} to {}",
            patch.display(),
            rom.display()
        )
    })?;

    if !quiet {
        println!(
            "✓ Patched '{}' -> '{}'",
            style(rom.display()).cyan(),
            style(applied.output_path.display()).green()
        );
        print_report(&applied.report);
    }

    Ok(())
}

fn execute_dry_run(rom: PathBuf, patch: PathBuf, quiet: bool) -> Result<()> {
    let rom_bytes = read_source(&rom)?;
    let patch_bytes = read_source(&patch)?;

    let (_, report) = ips_patch::apply_with_report(rom_bytes, &patch_bytes)
        .with_context(|| format!("Failed to apply {}", patch.display()))?;

    if !quiet {
        println!(
            "✓ '{}' applies cleanly to '{}' (dry run, nothing written)",
            style(patch.display()).cyan(),
            style(rom.display()).cyan()
        );
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ApplyReport) {
    println!(
        "  Records: {} ({} standard, {} rle)",
        style(report.records()).green(),
        report.standard_records,
        report.run_length_records
    );
    println!(
        "  Bytes written: {}",
        style(format_bytes(report.bytes_written as u64)).yellow()
    );

    let size = format!(
        "{} -> {}",
        format_bytes(report.base_len as u64),
        format_bytes(report.final_len as u64)
    );
    if report.grew() {
        println!(
            "  Size: {} ({})",
            size,
            style(format_growth(
                report.base_len as u64,
                report.final_len as u64
            ))
            .yellow()
        );
    } else {
        println!("  Size: {size}");
    }
}
