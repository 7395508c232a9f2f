//! In-memory output destination for testing.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared in-memory writer.
///
/// Hand a clone to [`Logger::set_output_for_tests`](crate::Logger::set_output_for_tests)
/// and inspect the captured lines through the original.
///
/// # Examples
///
/// ```
/// use ratelog::infrastructure::mocks::CaptureWriter;
/// use ratelog::{CallSite, Logger};
///
/// let output = CaptureWriter::new();
/// let logger = Logger::builder().with_timestamps_disabled(true).build().unwrap();
/// logger.set_output_for_tests(Box::new(output.clone()));
///
/// logger.warnf_at(CallSite::new("src/db.rs", 9), format_args!("slow query"));
///
/// assert_eq!(output.lines(), vec!["WARN\tsrc/db.rs:9\tslow query"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    /// Create an empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Captured lines without their trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Check if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discard everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer
            .lock()
            .expect("CaptureWriter mutex poisoned - a test thread panicked while holding the lock")
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
