//! Prefix search: every named platform along a queried location.

use crate::error::Result;
use crate::segment;
use crate::tree::{NodeId, PlatformTree};

impl PlatformTree {
    /// Walk `location` down from `from` and collect every named node visited,
    /// ancestors first.
    ///
    /// Unnamed nodes are passed through. The walk stops quietly at the first
    /// segment without a matching child, so an empty result means the path is
    /// well-formed but nothing is placed along it. A malformed `location`
    /// fails with [`crate::PlatformError::PathFormat`].
    pub fn find_platforms(&self, from: NodeId, location: &str) -> Result<Vec<NodeId>> {
        segment::validate_path(location, self.delimiter())?;

        let mut found = Vec::new();
        let mut current = self.get(from)?;
        for segment in segment::segments(location, self.delimiter()) {
            let Some(&child) = current.children_map().get(segment) else {
                break;
            };
            current = self.get(child)?;
            if current.is_named() {
                found.push(child);
            }
        }
        Ok(found)
    }

    /// Names of the platforms covering `location`, searched from the root.
    pub fn find_names(&self, location: &str) -> Result<Vec<&str>> {
        let ids = self.find_platforms(self.root(), location)?;
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(name) = self.name(id)? {
                names.push(name);
            }
        }
        Ok(names)
    }
}
