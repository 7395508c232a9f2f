//! Serialized output sink.
//!
//! Every rendered line is written under one lock, so lines from concurrent
//! callers never interleave. Writes are best-effort: a failed write is
//! dropped, never reported to the caller.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A boxed writer shared by all log calls.
pub type BoxedWriter = Box<dyn Write + Send>;

/// Shared destination for rendered lines.
pub struct OutputSink {
    writer: Mutex<BoxedWriter>,
}

impl OutputSink {
    /// Create a sink writing to `writer`.
    pub fn new(writer: BoxedWriter) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write one complete line and flush it.
    pub fn write_line(&self, line: &str) {
        let result = {
            let mut writer = self.lock();
            match writer.write_all(line.as_bytes()) {
                Ok(()) => writer.flush(),
                Err(err) => Err(err),
            }
        };
        if let Err(err) = result {
            tracing::trace!(error = %err, "dropping log line after write failure");
        }
    }

    /// Swap the destination, returning the previous one.
    ///
    /// Not meant to race with in-flight log calls: lines written by other
    /// threads around the swap may land on either writer.
    pub fn replace(&self, writer: BoxedWriter) -> BoxedWriter {
        std::mem::replace(&mut *self.lock(), writer)
    }

    fn lock(&self) -> MutexGuard<'_, BoxedWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink")
            .field("writer", &"<dyn Write>")
            .finish()
    }
}
