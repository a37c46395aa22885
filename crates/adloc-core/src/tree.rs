//! The platform hierarchy.
//!
//! Nodes live in a generational arena owned by [`PlatformTree`]. A parent owns
//! its children through the arena; the child's `parent` link is a plain
//! [`NodeId`] used only to rebuild the node's location. Handles to removed
//! nodes never resolve again, even after their slot is reused.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{PlatformError, Result};
use crate::segment::{self, DEFAULT_DELIMITER};

/// Handle to a node in a [`PlatformTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn idx(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A single platform (or structural placeholder) in the hierarchy.
#[derive(Debug, Clone)]
pub struct PlatformNode {
    generation: u32,
    name: Option<String>,
    segment: String,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
}

impl PlatformNode {
    /// The display name, if this node has been named.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this node carries a non-empty name.
    pub fn is_named(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// The segment this node occupies under its parent. Empty for the root.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The parent handle, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles, ordered by segment.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn children_map(&self) -> &BTreeMap<String, NodeId> {
        &self.children
    }
}

/// Arena-backed tree of platforms rooted at a fixed base path.
#[derive(Debug, Clone)]
pub struct PlatformTree {
    slots: Vec<Option<PlatformNode>>,
    // Last generation per slot; survives frees so stale handles stay stale.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    base: String,
    delimiter: char,
}

impl Default for PlatformTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformTree {
    /// An empty tree whose root has no base path, using `/` as delimiter.
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            base: String::new(),
            delimiter: DEFAULT_DELIMITER,
        };
        tree.root = tree.alloc(String::new(), None);
        tree
    }

    /// An empty tree whose root sits at `base` (for example `/root`).
    pub fn with_base(base: &str) -> Result<Self> {
        Self::with_options(Some(base), DEFAULT_DELIMITER)
    }

    /// An empty tree with an optional base path and a custom delimiter.
    pub fn with_options(base: Option<&str>, delimiter: char) -> Result<Self> {
        let mut tree = Self::new();
        tree.delimiter = delimiter;
        if let Some(base) = base {
            segment::validate_path(base, delimiter)?;
            tree.base = base.to_string();
        }
        Ok(tree)
    }

    /// The root handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The base path the root represents.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The segment delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Number of live nodes, including the root and any detached nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.get(self.root)
            .map(|root| root.children.is_empty())
            .unwrap_or(true)
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Borrow a live node.
    pub fn get(&self, id: NodeId) -> Result<&PlatformNode> {
        self.slots
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|node| node.generation == id.generation)
            .ok_or(PlatformError::MissingNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut PlatformNode> {
        self.slots
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|node| node.generation == id.generation)
            .ok_or(PlatformError::MissingNode(id))
    }

    /// Create a detached node for `segment`. Attach it with [`PlatformTree::add`].
    ///
    /// A detached node is not reachable from the root, so [`PlatformTree::clear`]
    /// never frees it. Release one that is no longer wanted with
    /// [`PlatformTree::discard`].
    pub fn create(&mut self, segment: &str, name: Option<String>) -> Result<NodeId> {
        segment::validate_segment(segment, self.delimiter)?;
        Ok(self.alloc(segment.to_string(), name))
    }

    fn alloc(&mut self, segment: String, name: Option<String>) -> NodeId {
        let (index, generation) = match self.free_list.pop() {
            Some(index) => {
                let generation = self.generations[index].wrapping_add(1);
                self.generations[index] = generation;
                (index, generation)
            }
            None => {
                self.generations.push(1);
                self.slots.push(None);
                (self.slots.len() - 1, 1)
            }
        };
        self.slots[index] = Some(PlatformNode {
            generation,
            name,
            segment,
            parent: None,
            children: BTreeMap::new(),
        });
        NodeId {
            index: index as u32,
            generation,
        }
    }

    /// The node's name, if it has one.
    pub fn name(&self, id: NodeId) -> Result<Option<&str>> {
        Ok(self.get(id)?.name())
    }

    /// Assign a name to a node.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Turn a node back into a structural placeholder.
    pub fn unset_name(&mut self, id: NodeId) -> Result<()> {
        self.get_mut(id)?.name = None;
        Ok(())
    }

    /// Full location of a node: the base path followed by every segment from
    /// the root down.
    pub fn location(&self, id: NodeId) -> Result<String> {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            parts.push(node.segment.as_str());
            current = node.parent;
        }
        let mut location = self.base.clone();
        for part in parts.iter().rev() {
            location.push_str(part);
        }
        Ok(location)
    }

    /// Direct child of `parent` at `segment`.
    ///
    /// Fails with [`PlatformError::PathFormat`] if `segment` is not a single
    /// valid segment.
    pub fn lookup(&self, parent: NodeId, segment: &str) -> Result<Option<NodeId>> {
        segment::validate_segment(segment, self.delimiter)?;
        Ok(self.get(parent)?.children.get(segment).copied())
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Adding the node that already occupies its slot is a no-op.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        let segment = self.get(child)?.segment.clone();

        match self.get(parent)?.children.get(&segment).copied() {
            Some(existing) if existing == child => return Ok(()),
            Some(existing) => {
                let occupant = self.get(existing)?;
                let owner = match occupant.name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => self.location(existing)?,
                };
                return Err(PlatformError::DuplicateChild {
                    parent: self.location(parent)?,
                    segment,
                    owner,
                });
            }
            None => {}
        }

        if child == self.root || self.is_ancestor_or_self(child, parent)? {
            return Err(PlatformError::CyclicAttach {
                parent: self.location(parent)?,
                child: self.location(child)?,
            });
        }

        self.detach(child)?;
        self.attach(parent, child, segment)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, segment: String) -> Result<()> {
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.insert(segment, child);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        let node = self.get_mut(child)?;
        let Some(parent) = node.parent.take() else {
            return Ok(());
        };
        let segment = node.segment.clone();
        self.get_mut(parent)?.children.remove(&segment);
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> Result<bool> {
        let mut current = Some(of);
        while let Some(node_id) = current {
            if node_id == candidate {
                return Ok(true);
            }
            current = self.get(node_id)?.parent;
        }
        Ok(false)
    }

    /// The child at `segment`, creating an unnamed one if absent.
    pub fn get_or_add(&mut self, parent: NodeId, segment: &str) -> Result<NodeId> {
        if let Some(existing) = self.lookup(parent, segment)? {
            return Ok(existing);
        }
        let child = self.alloc(segment.to_string(), None);
        self.attach(parent, child, segment.to_string())?;
        Ok(child)
    }

    /// Detach and destroy `child` and its subtree.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let node = self.get(child)?;
        if node.parent != Some(parent) {
            return Err(PlatformError::MissingChild {
                parent: self.location(parent)?,
                segment: node.segment.clone(),
            });
        }
        self.detach(child)?;
        self.free_subtree(child);
        Ok(())
    }

    /// Detach and destroy the child at `segment`.
    ///
    /// Fails with [`PlatformError::MissingChild`] when there is no such child.
    pub fn remove_segment(&mut self, parent: NodeId, segment: &str) -> Result<()> {
        match self.lookup(parent, segment)? {
            Some(child) => self.remove(parent, child),
            None => Err(PlatformError::MissingChild {
                parent: self.location(parent)?,
                segment: segment.to_string(),
            }),
        }
    }

    /// Destroy every descendant of `id`. The node itself keeps its name.
    pub fn clear(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(id)?.children);
        let count = children.len();
        for child in children.into_values() {
            self.free_subtree(child);
        }
        tracing::trace!(node = %id, children = count, "cleared subtree");
        Ok(())
    }

    /// Destroy `id` and its subtree, detaching it first if it has a parent.
    ///
    /// Works for nodes from [`PlatformTree::create`] that were never added.
    pub fn discard(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(PlatformError::RootDiscard);
        }
        self.detach(id)?;
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.slots.get_mut(node_id.idx()).and_then(Option::take) else {
                continue;
            };
            stack.extend(node.children.into_values());
            self.free_list.push(node_id.idx());
        }
    }

    /// Depth-first, pre-order list of `id` and all its descendants. Siblings
    /// are visited in segment order.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            out.push(node_id);
            stack.extend(node.children.values().rev().copied());
        }
        Ok(out)
    }

    /// Number of named nodes reachable from the root.
    pub fn platform_count(&self) -> usize {
        self.descendants(self.root)
            .map(|ids| {
                ids.into_iter()
                    .filter(|&id| self.get(id).map(PlatformNode::is_named).unwrap_or(false))
                    .count()
            })
            .unwrap_or(0)
    }
}
