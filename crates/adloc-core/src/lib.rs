//! Platform hierarchy for adloc.
//!
//! Advertising platforms are placed at slash-delimited locations such as
//! `/ru/svrd/revda`. A platform placed at a location covers every location
//! beneath it, so a query for `/ru/svrd/revda` returns the platforms at `/ru`,
//! `/ru/svrd` and `/ru/svrd/revda`, in that order.
//!
//! - **Segmentation:** [`segment`] splits and validates locations
//! - **Hierarchy:** [`PlatformTree`] owns the nodes and their mutation
//! - **Loading:** [`PlatformTree::parse`] builds the tree from `name:/path,...` lines
//! - **Search:** [`PlatformTree::find_platforms`] performs the prefix search

pub mod error;
mod parse;
pub mod render;
mod search;
pub mod segment;
pub mod tree;

pub use error::{LineFault, PlatformError, Result};
pub use render::{format_tree, to_text};
pub use segment::{cut_first_segment, is_valid_path, segments, DEFAULT_DELIMITER};
pub use tree::{NodeId, PlatformNode, PlatformTree};
