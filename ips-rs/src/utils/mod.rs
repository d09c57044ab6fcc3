//! Shared utilities for the ips-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
