//! Call site capture.
//!
//! A call site is the `file:line` of the code that issued a log call. It is
//! both rendered into every output line and used as the rate limiting key.
//!
//! Locations are carried by `#[track_caller]`: every function between the
//! user's code and [`CallSite::capture`] is annotated, so the captured
//! location is the outermost non-annotated caller. A wrapping layer that wants
//! its own callers to be blamed annotates its functions the same way, or
//! passes an explicit [`CallSite`] to the `*_at` entry points.

use std::fmt;
use std::panic::Location;

/// File name rendered when a location is not available.
pub const UNKNOWN_FILE: &str = "???";

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Create a call site from raw parts.
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// The `???:0` placeholder used when no location is known.
    pub const fn unknown() -> Self {
        Self::new(UNKNOWN_FILE, 0)
    }

    /// Capture the location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn capture() -> Self {
        Self::from_location(Location::caller())
    }

    /// Convert a `std::panic::Location`.
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Source file as reported by the compiler.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line number, `0` when unknown.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// File name with everything up to and including `root_marker` removed.
    ///
    /// Paths that do not contain the marker are returned unchanged.
    pub fn relative_file(&self, root_marker: Option<&str>) -> &'static str {
        let file = self.file;
        match root_marker.filter(|marker| !marker.is_empty()) {
            Some(marker) => match file.find(marker) {
                Some(n) => &file[n + marker.len()..],
                None => file,
            },
            None => file,
        }
    }

    /// Render as `file:line`, stripping the root marker.
    pub fn render(&self, root_marker: Option<&str>) -> String {
        format!("{}:{}", self.relative_file(root_marker), self.line)
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::from_location(location)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
