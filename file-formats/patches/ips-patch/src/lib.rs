//! Reader, writer and applier for IPS (International Patching System) patches.
//!
//! IPS is the classic binary patch format used to distribute ROM hacks and
//! translations. A patch is the `PATCH` magic, a list of offset-addressed
//! records and an `EOF` sentinel. Records either copy literal bytes or fill a
//! run with a single value, and may write past the end of the base image,
//! which extends it.
//!
//! # Examples
//!
//! Applying a patch in memory:
//!
//! ```
//! let base = b"AAAAAAAAAA".to_vec();
//! let patch = b"PATCH\x00\x00\x02\x00\x00\x00\x03ZEOF";
//!
//! let patched = ips_patch::apply(base, patch)?;
//! assert_eq!(patched, b"AAZZZAAAAA");
//! # Ok::<(), ips_patch::PatchError>(())
//! ```
//!
//! Applying a patch file to a ROM on disk, writing `game.patched.nes`:
//!
//! ```no_run
//! use std::path::Path;
//!
//! let applied = ips_patch::fs::apply_file(Path::new("game.nes"), Path::new("fix.ips"), None)?;
//! println!("{} records -> {}", applied.report.records(), applied.output_path.display());
//! # Ok::<(), ips_patch::PatchError>(())
//! ```
//!
//! # Failure semantics
//!
//! Errors abort the whole operation. [`PatchApplier::apply_to`] patches a
//! caller-owned buffer in place and is not transactional; [`apply_atomic`]
//! only commits when every record applied.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod apply;
pub mod buffer;
pub mod error;
pub mod fs;
pub mod reader;
pub mod record;
pub mod writer;

pub use apply::{ApplyReport, PatchApplier, apply, apply_atomic, apply_with_report};
pub use buffer::PatchableBuffer;
pub use error::{FormatError, PatchError, Result};
pub use reader::{PatchRecordReader, Records};
pub use record::{EOF_MARKER, HEADER_MAGIC, MAX_OFFSET, PatchRecord, RecordKind};
pub use writer::PatchWriter;
