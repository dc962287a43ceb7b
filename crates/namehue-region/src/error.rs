//! Error types for region patching.

use thiserror::Error;

/// Errors raised when a stylesheet's markers or a replacement body do not
/// describe a single well-formed region.
///
/// Every variant means "do not touch the file": the patcher refuses to pick a
/// splice point when the markers are ambiguous. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// The replacement body does not begin with the start marker line and end
    /// with the end marker line, or repeats one of them.
    #[error("replacement body for '{start}' is malformed: {reason}")]
    MalformedBody { start: String, reason: &'static str },

    /// A start marker is present with no end marker anywhere in the text.
    #[error("'{marker}' on line {line} has no matching end marker")]
    UnmatchedStart { marker: String, line: usize },

    /// An end marker is present with no start marker anywhere in the text.
    #[error("'{marker}' on line {line} has no matching start marker")]
    UnmatchedEnd { marker: String, line: usize },

    /// Both markers are present but the end marker comes first.
    #[error("end marker '{end}' on line {end_line} precedes start marker '{start}' on line {start_line}")]
    EndBeforeStart {
        start: String,
        end: String,
        start_line: usize,
        end_line: usize,
    },

    /// A marker line occurs more than once.
    #[error("'{marker}' occurs more than once (lines {lines:?})")]
    DuplicateMarker { marker: String, lines: Vec<usize> },
}

/// Result type for region operations.
pub type Result<T> = std::result::Result<T, RegionError>;
