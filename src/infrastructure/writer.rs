//! `io::Write` adapter logging every write as an `ERROR`.
//!
//! Useful for handing the logger to code that only knows how to report
//! problems to a writer. Each `write` call becomes one `ERROR` record,
//! attributed to the place the writer was created and rate limited like any
//! other error from that location.

use crate::domain::location::CallSite;
use crate::infrastructure::logger::Logger;
use std::io;

/// Writer that logs each write at `ERROR`.
#[derive(Debug, Clone, Copy)]
pub struct ErrorWriter<'a> {
    logger: &'a Logger,
    site: CallSite,
}

impl<'a> ErrorWriter<'a> {
    /// Create a writer attributed to the caller.
    #[track_caller]
    pub fn new(logger: &'a Logger) -> Self {
        Self::at(logger, CallSite::capture())
    }

    /// Create a writer attributed to `site`.
    pub fn at(logger: &'a Logger, site: CallSite) -> Self {
        Self { logger, site }
    }

    /// Call site every record is attributed to.
    pub fn site(&self) -> CallSite {
        self.site
    }
}

impl io::Write for ErrorWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = String::from_utf8_lossy(buf);
        self.logger
            .errorf_at(self.site, format_args!("{}", message));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::CaptureWriter;
    use std::io::Write;

    fn logger(output: &CaptureWriter) -> Logger {
        let logger = Logger::builder()
            .with_timestamps_disabled(true)
            .with_errors_per_second_limit(2)
            .build()
            .unwrap();
        logger.set_output_for_tests(Box::new(output.clone()));
        logger
    }

    #[test]
    fn test_write_logs_error_at_creation_site() {
        let output = CaptureWriter::new();
        let logger = logger(&output);

        let line = line!() + 1;
        let mut writer = ErrorWriter::new(&logger);
        writer.write_all(b"http: TLS handshake error\n").unwrap();

        assert_eq!(
            output.lines(),
            vec![format!(
                "ERROR\t{}:{}\thttp: TLS handshake error",
                file!(),
                line
            )]
        );
    }

    #[test]
    fn test_writes_are_rate_limited() {
        let output = CaptureWriter::new();
        let logger = logger(&output);
        let mut writer = ErrorWriter::at(&logger, CallSite::new("src/net.rs", 5));

        for _ in 0..10 {
            writer.write_all(b"broken pipe").unwrap();
        }

        assert_eq!(output.lines().len(), 3);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let output = CaptureWriter::new();
        let logger = logger(&output);
        let mut writer = ErrorWriter::at(&logger, CallSite::new("src/net.rs", 5));

        writer.write_all(&[b'o', b'k', 0xff]).unwrap();

        assert_eq!(output.lines(), vec!["ERROR\tsrc/net.rs:5\tok\u{fffd}"]);
    }
}
