//! Error types for platform hierarchy operations.

use std::fmt;
use std::path::PathBuf;

use crate::tree::NodeId;

/// Errors that can occur while building or querying a platform hierarchy.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// A location or segment does not match the `/segment/...` grammar.
    #[error("path '{path}' has an invalid format")]
    PathFormat {
        /// The offending string, verbatim.
        path: String,
    },

    /// A different node already occupies the segment slot.
    #[error("segment '{segment}' under '{parent}' is already taken by platform '{owner}'")]
    DuplicateChild {
        /// Location of the parent being added to.
        parent: String,
        /// The contested segment.
        segment: String,
        /// Name (or location, if unnamed) of the current occupant.
        owner: String,
    },

    /// A node handle was not supplied or no longer refers to a live node.
    #[error("node {0} does not exist in this tree")]
    MissingNode(NodeId),

    /// Removal was requested for a segment with no child.
    #[error("no platform at segment '{segment}' under '{parent}'")]
    MissingChild {
        /// Location of the parent.
        parent: String,
        /// The segment that resolved to nothing.
        segment: String,
    },

    /// Attaching would place a node beneath itself.
    #[error("cannot attach '{child}' beneath its own descendant '{parent}'")]
    CyclicAttach {
        /// Location of the intended parent.
        parent: String,
        /// Location of the node being attached.
        child: String,
    },

    /// The root of a tree was passed to [`crate::PlatformTree::discard`].
    #[error("the root node cannot be discarded")]
    RootDiscard,

    /// A line of bulk input is malformed.
    #[error("line {line}: {fault}")]
    ParseFormat {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        fault: LineFault,
    },

    /// Bulk input contained no lines.
    #[error("input contains no data")]
    NoData,

    /// Data file not found.
    #[error("data file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// I/O error reading a data file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The reason a line of bulk input was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    /// The line does not split into exactly `name` and `locations` on `:`.
    MissingSeparator,
    /// The name or the locations field is empty.
    EmptyField,
    /// One of the comma-separated locations is not a valid path.
    InvalidPath(String),
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineFault::MissingSeparator => f.write_str(
                "does not match the format 'name:/path1/path2'; the ':' separator may be missing or repeated",
            ),
            LineFault::EmptyField => f.write_str("name and/or path is empty"),
            LineFault::InvalidPath(path) => write!(f, "path '{path}' has an invalid format"),
        }
    }
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
