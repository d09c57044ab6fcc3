//! File-level helpers around the in-memory patcher
//!
//! Reads the ROM and patch from disk, applies the patch, and writes the
//! result next to the ROM (or to an explicit destination). The ROM file
//! itself is never modified.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::apply::{ApplyReport, apply_with_report};
use crate::error::{PatchError, Result};

/// Marker inserted into the ROM file name by [`default_output_path`]
pub const DEFAULT_OUTPUT_MARKER: &str = "patched";

/// Outcome of [`apply_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFile {
    /// Where the patched image was written
    pub output_path: PathBuf,
    /// Summary of the applied records
    pub report: ApplyReport,
}

/// Read an input file into memory
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| PatchError::source_unreadable(path, e))
}

/// Write `bytes` to `path`
///
/// The data goes to a temporary file in the destination directory first and
/// is moved into place once fully written, so a failed write never leaves a
/// truncated output behind.
pub fn write_destination<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| PatchError::destination_unwritable(path, e))?;
    temp_file
        .write_all(bytes)
        .and_then(|()| temp_file.flush())
        .map_err(|e| PatchError::destination_unwritable(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| PatchError::destination_unwritable(path, e.error))?;

    log::debug!("Wrote {} byte(s) to {}", bytes.len(), path.display());
    Ok(())
}

/// Default destination for a patched ROM: `game.nes` becomes `game.patched.nes`
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ips_patch::fs::default_output_path;
///
/// assert_eq!(
///     default_output_path(Path::new("roms/game.nes")),
///     Path::new("roms/game.patched.nes")
/// );
/// assert_eq!(default_output_path(Path::new("image")), Path::new("image.patched"));
/// ```
pub fn default_output_path(rom_path: &Path) -> PathBuf {
    output_path_with_marker(rom_path, DEFAULT_OUTPUT_MARKER)
}

/// Insert `.{marker}` before the extension of `rom_path`'s file name
pub fn output_path_with_marker(rom_path: &Path, marker: &str) -> PathBuf {
    let mut name = rom_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".");
    name.push(marker);
    if let Some(extension) = rom_path.extension() {
        name.push(".");
        name.push(extension);
    }
    rom_path.with_file_name(name)
}

/// Patch `rom_path` with `patch_path` and write the result
///
/// The result goes to `output` when given, otherwise to
/// [`default_output_path`]. Nothing is written if the patch fails to apply.
pub fn apply_file(
    rom_path: &Path,
    patch_path: &Path,
    output: Option<&Path>,
) -> Result<AppliedFile> {
    let rom = read_source(rom_path)?;
    let patch = read_source(patch_path)?;

    log::info!(
        "Applying {} ({} bytes) to {} ({} bytes)",
        patch_path.display(),
        patch.len(),
        rom_path.display(),
        rom.len()
    );

    let (patched, report) = apply_with_report(rom, &patch)?;

    let output_path = output.map_or_else(|| default_output_path(rom_path), Path::to_path_buf);
    write_destination(&output_path, &patched)?;

    Ok(AppliedFile {
        output_path,
        report,
    })
}
