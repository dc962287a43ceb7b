//! Marker pairs and the line-based region splice.
//!
//! A region is the run of lines from a start marker line through an end
//! marker line, inclusive. Matching is line-exact: a marker only counts when
//! it is the whole line (a trailing `\r` is ignored so CRLF files behave).
//!
//! # Example
//!
//! ```rust
//! use namehue_region::{replace_region, Region};
//!
//! let region = Region::named("X");
//! let text = "A\n/* X START */\nold\n/* X END */\nB\n";
//! let body = region.wrap(["new\n"]);
//!
//! let patched = replace_region(text, &region, &body).unwrap();
//! assert_eq!(patched, "A\n/* X START */\nnew\n/* X END */\nB\n");
//! ```

use crate::error::{RegionError, Result};

/// A named pair of marker lines delimiting one region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    start: String,
    end: String,
}

impl Region {
    /// Creates the conventional CSS comment pair `/* NAME START */` and
    /// `/* NAME END */`.
    pub fn named(name: &str) -> Self {
        Self {
            start: format!("/* {} START */", name),
            end: format!("/* {} END */", name),
        }
    }

    /// Creates a region from explicit marker lines.
    ///
    /// The markers must differ and must not contain line breaks.
    pub fn with_markers(start: impl Into<String>, end: impl Into<String>) -> Self {
        let start = start.into();
        let end = end.into();
        debug_assert_ne!(start, end, "region markers must differ");
        Self { start, end }
    }

    /// The start marker line, without a line terminator.
    pub fn start_marker(&self) -> &str {
        &self.start
    }

    /// The end marker line, without a line terminator.
    pub fn end_marker(&self) -> &str {
        &self.end
    }

    /// Builds a complete region body: the start marker line, each rule in
    /// order, then the end marker line.
    ///
    /// Rules are concatenated verbatim, so each should carry its own trailing
    /// newline.
    pub fn wrap<I, S>(&self, rules: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut body = String::new();
        body.push_str(&self.start);
        body.push('\n');
        for rule in rules {
            body.push_str(rule.as_ref());
        }
        if !body.ends_with('\n') {
            body.push('\n');
        }
        body.push_str(&self.end);
        body.push('\n');
        body
    }
}

/// Location of a region within a text, as 0-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Index of the start marker line.
    pub start: usize,
    /// Index of the end marker line.
    pub end: usize,
}

/// Strips the line terminator from a line produced by `split_inclusive`.
fn line_content(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn marker_positions(lines: &[&str], marker: &str) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line_content(line) == marker)
        .map(|(i, _)| i)
        .collect()
}

fn locate_lines(lines: &[&str], region: &Region) -> Result<Option<Span>> {
    let starts = marker_positions(lines, &region.start);
    let ends = marker_positions(lines, &region.end);

    if starts.len() > 1 {
        return Err(RegionError::DuplicateMarker {
            marker: region.start.clone(),
            lines: starts.iter().map(|i| i + 1).collect(),
        });
    }
    if ends.len() > 1 {
        return Err(RegionError::DuplicateMarker {
            marker: region.end.clone(),
            lines: ends.iter().map(|i| i + 1).collect(),
        });
    }

    match (starts.first(), ends.first()) {
        (None, None) => Ok(None),
        (Some(&start), None) => Err(RegionError::UnmatchedStart {
            marker: region.start.clone(),
            line: start + 1,
        }),
        (None, Some(&end)) => Err(RegionError::UnmatchedEnd {
            marker: region.end.clone(),
            line: end + 1,
        }),
        (Some(&start), Some(&end)) if end < start => Err(RegionError::EndBeforeStart {
            start: region.start.clone(),
            end: region.end.clone(),
            start_line: start + 1,
            end_line: end + 1,
        }),
        (Some(&start), Some(&end)) => Ok(Some(Span { start, end })),
    }
}

/// Finds `region` in `text`.
///
/// Returns `Ok(None)` when neither marker is present, and an error when the
/// markers are present but do not form exactly one ordered pair.
pub fn locate(text: &str, region: &Region) -> Result<Option<Span>> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    locate_lines(&lines, region)
}

/// Returns the current body of `region` (markers included), if present.
pub fn extract_region<'a>(text: &'a str, region: &Region) -> Result<Option<&'a str>> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let Some(span) = locate_lines(&lines, region)? else {
        return Ok(None);
    };
    let offset: usize = lines[..span.start].iter().map(|l| l.len()).sum();
    let len: usize = lines[span.start..=span.end].iter().map(|l| l.len()).sum();
    Ok(Some(&text[offset..offset + len]))
}

/// Checks that `body` starts with the start marker, ends with the end marker,
/// and contains each exactly once.
fn validate_body(body: &str, region: &Region) -> Result<()> {
    let malformed = |reason| RegionError::MalformedBody {
        start: region.start.clone(),
        reason,
    };
    let lines: Vec<&str> = body.split_inclusive('\n').collect();
    let framed = lines.len() >= 2
        && lines.first().is_some_and(|l| line_content(l) == region.start)
        && lines.last().is_some_and(|l| line_content(l) == region.end);
    if !framed {
        return Err(malformed(
            "must begin with the start marker and end with the end marker",
        ));
    }
    if marker_positions(&lines, &region.start).len() != 1
        || marker_positions(&lines, &region.end).len() != 1
    {
        return Err(malformed("markers may appear only once"));
    }
    Ok(())
}

/// Replaces `region` in `text` with `body`.
///
/// - When the region exists, every line from the start marker through the
///   end marker is removed and `body` is inserted in its place. All other
///   lines keep their order and bytes.
/// - When neither marker exists, `body` is appended (after a line break if
///   the text does not already end with one).
/// - When the markers are unbalanced, out of order or duplicated, the text is
///   left alone and an error is returned.
///
/// `body` must itself be a complete region (see [`Region::wrap`]). A missing
/// final newline is added so the end marker never merges with the next line.
pub fn replace_region(text: &str, region: &Region, body: &str) -> Result<String> {
    validate_body(body, region)?;

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let span = locate_lines(&lines, region)?;

    let mut out = String::with_capacity(text.len() + body.len() + 1);
    match span {
        Some(span) => {
            out.extend(lines[..span.start].iter().copied());
            push_body(&mut out, body);
            out.extend(lines[span.end + 1..].iter().copied());
        }
        None => {
            out.push_str(text);
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            push_body(&mut out, body);
        }
    }
    Ok(out)
}

fn push_body(out: &mut String, body: &str) {
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
}
