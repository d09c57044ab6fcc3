//! `validate` command: decode a patch end to end

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use ips_patch::fs::read_source;

use super::info::PatchInspection;

pub fn execute(path: PathBuf, quiet: bool) -> Result<()> {
    let data = read_source(&path)?;

    match PatchInspection::inspect(&data) {
        Ok(inspection) => {
            if !quiet {
                println!(
                    "✓ IPS patch '{}' is valid ({} records)",
                    style(path.display()).cyan(),
                    style(inspection.records.len()).green()
                );
            }
            if inspection.trailing_bytes > 0 {
                log::warn!(
                    "{} byte(s) follow the EOF marker and will be ignored",
                    inspection.trailing_bytes
                );
            }
            Ok(())
        }
        Err(err) => {
            anyhow::bail!("Validation failed for {}: {}", path.display(), err);
        }
    }
}
