//! Formatting utilities

use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a target address the way patch tools print them
pub fn format_offset(offset: u64) -> String {
    format!("0x{offset:06X}")
}

/// Format a signed size change, e.g. `+1.02 kB`
pub fn format_growth(before: u64, after: u64) -> String {
    if after >= before {
        format!("+{}", format_bytes(after - before))
    } else {
        format!("-{}", format_bytes(before - after))
    }
}
