//! Path segmentation and validation.
//!
//! A location is a sequence of segments, each starting with the delimiter
//! (`/` by default) followed by at least two further characters:
//! `/ru/vkustoch` is made of `/ru` and `/vkustoch`.

use crate::error::{PlatformError, Result};

/// The delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = '/';

/// Minimum segment length, counting the leading delimiter.
const MIN_SEGMENT_LEN: usize = 3;

/// Split the first segment off `location`.
///
/// A delimiter at index 0 opens the segment; any later delimiter ends it.
/// Returns the segment (with its leading delimiter) and the remainder, which
/// starts at the terminating delimiter or is empty. The segment is not
/// guaranteed to start with the delimiter; use [`is_valid_path`] for that.
pub fn cut_first_segment(location: &str, delimiter: char) -> (&str, &str) {
    let end = location
        .char_indices()
        .find(|&(index, c)| index > 0 && c == delimiter)
        .map(|(index, _)| index)
        .unwrap_or(location.len());
    location.split_at(end)
}

/// Iterate over the segments of `location`, in order.
pub fn segments(location: &str, delimiter: char) -> Segments<'_> {
    Segments {
        rest: location,
        delimiter,
    }
}

/// Iterator returned by [`segments`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
    delimiter: char,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let (segment, rest) = cut_first_segment(self.rest, self.delimiter);
        self.rest = rest;
        Some(segment)
    }
}

/// Check that `location` matches `/segment[/segment...]`.
///
/// Rejects empty input, input not starting with the delimiter, segments
/// shorter than two characters after the delimiter, and trailing delimiters.
pub fn is_valid_path(location: &str, delimiter: char) -> bool {
    if location.is_empty() {
        return false;
    }
    segments(location, delimiter).all(|segment| {
        segment.starts_with(delimiter) && segment.chars().count() >= MIN_SEGMENT_LEN
    })
}

/// Like [`is_valid_path`], but returns a [`PlatformError::PathFormat`]
/// carrying the offending string.
pub fn validate_path(location: &str, delimiter: char) -> Result<()> {
    if is_valid_path(location, delimiter) {
        Ok(())
    } else {
        Err(PlatformError::PathFormat {
            path: location.to_string(),
        })
    }
}

/// Check that `segment` is exactly one valid segment.
pub fn is_valid_segment(segment: &str, delimiter: char) -> bool {
    is_valid_path(segment, delimiter) && cut_first_segment(segment, delimiter).1.is_empty()
}

/// Like [`is_valid_segment`], but returns a [`PlatformError::PathFormat`].
pub fn validate_segment(segment: &str, delimiter: char) -> Result<()> {
    if is_valid_segment(segment, delimiter) {
        Ok(())
    } else {
        Err(PlatformError::PathFormat {
            path: segment.to_string(),
        })
    }
}
