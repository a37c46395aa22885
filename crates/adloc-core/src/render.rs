//! Human-readable and re-loadable views of a platform hierarchy.
//!
//! [`format_tree`] draws the hierarchy as an ASCII tree:
//! ```text
//! (root)
//! ├── /ru  Yandex.Direct
//! │   ├── /msk  Gazeta uralskih moskvichey
//! │   └── /svrd  Krutaya reklama
//! │       └── /revda  Revdinsky worker
//! └── /kz  (structural)
//! ```
//! [`to_text`] writes it back out in the upload format.

use std::collections::HashMap;

use crate::error::Result;
use crate::tree::{NodeId, PlatformTree};

/// Format the whole hierarchy as a human-readable string.
pub fn format_tree(tree: &PlatformTree) -> Result<String> {
    let root = tree.root();
    let mut out = if tree.base().is_empty() {
        "(root)\n".to_string()
    } else {
        format!("{}\n", tree.base())
    };

    let children: Vec<NodeId> = tree.get(root)?.children().collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        format_node(tree, &mut out, child, "", i == count - 1)?;
    }

    let nodes = tree.descendants(root)?.len() - 1;
    out.push_str(&format!(
        "\n{} platforms ({} nodes)\n",
        tree.platform_count(),
        nodes
    ));
    Ok(out)
}

/// Recursively format a node and its children.
fn format_node(
    tree: &PlatformTree,
    out: &mut String,
    id: NodeId,
    prefix: &str,
    is_last: bool,
) -> Result<()> {
    let node = tree.get(id)?;
    let connector = if is_last { "└── " } else { "├── " };
    let label = match node.name() {
        Some(name) if node.is_named() => name,
        _ => "(structural)",
    };
    out.push_str(&format!("{prefix}{connector}{}  {label}\n", node.segment()));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let children: Vec<NodeId> = node.children().collect();
    let child_count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        format_node(tree, out, child, &child_prefix, i == child_count - 1)?;
    }
    Ok(())
}

/// Serialise the hierarchy back to `name:/path1,/path2` lines.
///
/// Names appear in depth-first order of their first location; structural
/// nodes are omitted. Locations are relative to the root, so the base path
/// is not included. An empty hierarchy yields an empty string.
pub fn to_text(tree: &PlatformTree) -> Result<String> {
    let root = tree.root();
    let base_len = tree.base().len();

    let mut order: Vec<(&str, Vec<String>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for id in tree.descendants(root)? {
        let node = tree.get(id)?;
        let Some(name) = node.name().filter(|_| node.is_named()) else {
            continue;
        };
        if id == root {
            continue;
        }
        let location = tree.location(id)?[base_len..].to_string();
        match positions.get(name) {
            Some(&pos) => order[pos].1.push(location),
            None => {
                positions.insert(name, order.len());
                order.push((name, vec![location]));
            }
        }
    }

    let lines: Vec<String> = order
        .into_iter()
        .map(|(name, locations)| format!("{name}:{}", locations.join(",")))
        .collect();
    Ok(lines.join("\n"))
}
