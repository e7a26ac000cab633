use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

/// How a node came into the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Person with their own input row
    Listed,
    /// Only referenced as somebody's supervisor
    Unlisted,
    /// Synthetic root joining several top-level people
    Sentinel,
}

/// Data payload for tree nodes representing people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Full name, or the root label for the sentinel
    pub name: String,
    pub kind: NodeKind,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Person data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in edge-insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree structure for the reporting hierarchy.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Name of the node at `idx`, empty string for stale indices.
    pub fn name(&self, idx: Index) -> &str {
        self.get_node(idx)
            .map(|n| n.data.name.as_str())
            .unwrap_or_default()
    }

    /// Depth-first, left-to-right traversal starting at the root.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// All (parent, child) name pairs in pre-order.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.iter()
            .filter_map(|(_, node)| {
                node.parent
                    .map(|p| (self.name(p).to_string(), node.data.name.clone()))
            })
            .collect()
    }

    /// Number of levels; a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        // post-order visits children before parents, so heights are ready
        let mut heights = std::collections::HashMap::new();
        for (idx, node) in self.iter_postorder() {
            let height = 1 + node
                .children
                .iter()
                .filter_map(|c| heights.get(c))
                .max()
                .copied()
                .unwrap_or(0);
            heights.insert(idx, height);
        }
        self.root
            .and_then(|r| heights.get(&r).copied())
            .unwrap_or(0)
    }

    /// Collects the names of all leaf nodes (people without reports).
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.name.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> NodeData {
        NodeData {
            name: name.to_string(),
            kind: NodeKind::Listed,
        }
    }

    fn sample() -> TreeArena {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(person("root"), None);
        let a = tree.insert_node(person("a"), Some(root));
        tree.insert_node(person("b"), Some(root));
        tree.insert_node(person("a1"), Some(a));
        tree
    }

    #[test]
    fn given_tree_when_iterating_then_visits_preorder_left_to_right() {
        let tree = sample();
        let names: Vec<_> = tree.iter().map(|(_, n)| n.data.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_children_come_first() {
        let tree = sample();
        let names: Vec<_> = tree
            .iter_postorder()
            .map(|(_, n)| n.data.name.as_str())
            .collect();
        assert_eq!(names, vec!["a1", "a", "b", "root"]);
    }

    #[test]
    fn given_tree_when_measuring_then_reports_depth_and_leaves() {
        let tree = sample();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_nodes(), vec!["a1", "b"]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn given_empty_tree_when_measuring_then_zero() {
        let tree = TreeArena::new();
        assert_eq!(tree.depth(), 0);
        assert!(tree.leaf_nodes().is_empty());
        assert!(tree.edges().is_empty());
    }

    #[test]
    fn given_tree_when_listing_edges_then_parent_child_pairs_in_preorder() {
        let tree = sample();
        assert_eq!(
            tree.edges(),
            vec![
                ("root".to_string(), "a".to_string()),
                ("a".to_string(), "a1".to_string()),
                ("root".to_string(), "b".to_string()),
            ]
        );
    }
}
