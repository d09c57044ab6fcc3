//! Log output of the applier
//!
//! Kept in its own test binary: the global logger can only be installed once.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use ips_patch::{PatchWriter, apply};

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_apply_logs_records_and_summary() {
    let captured = CapturedLog::default();
    env_logger::Builder::new()
        .filter_module("ips_patch", log::LevelFilter::Trace)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(captured.clone())))
        .try_init()
        .unwrap();

    let mut writer = PatchWriter::new();
    writer.standard(2, b"XYZ").unwrap();
    writer.run_length(8, 3, 0x5A).unwrap();
    let mut patch = writer.finish();
    patch.extend_from_slice(b"!!");

    let patched = apply(b"AAAA".to_vec(), &patch).unwrap();
    assert_eq!(patched.len(), 11);

    let output = captured.contents();
    assert!(output.contains("TRACE"), "{output}");
    assert!(output.contains("standard @ 0x000002"), "{output}");
    assert!(output.contains("rle @ 0x000008: 3 x 0x5A"), "{output}");
    assert!(
        output.contains("Ignoring 2 trailing byte(s) after EOF marker"),
        "{output}"
    );
    assert!(
        output.contains("Applied 2 record(s) (1 standard, 1 rle): 4 -> 11 bytes"),
        "{output}"
    );
}
