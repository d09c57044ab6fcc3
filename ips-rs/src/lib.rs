//! ips-rs library
//!
//! Command definitions and helpers behind the `ips-rs` binary.

pub mod cli;
pub mod commands;
pub mod utils;
