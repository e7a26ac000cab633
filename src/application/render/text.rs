/*
Terminal rendering of the hierarchy.

termtree::Tree is built bottom-up from owned leaves, so the arena is walked
recursively from the root.
 */
use generational_arena::Index;
use termtree::Tree;

use crate::domain::{Hierarchy, NodeKind, TreeArena};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index) -> Tree<String> {
            let Some(node) = arena.get_node(node_idx) else {
                return Tree::new(String::new());
            };
            let label = match node.data.kind {
                NodeKind::Listed => node.data.name.clone(),
                NodeKind::Unlisted => format!("{} (not listed)", node.data.name),
                NodeKind::Sentinel => format!("[{}]", node.data.name),
            };
            let leaves: Vec<_> = node
                .children
                .iter()
                .map(|&child| build_tree(arena, child))
                .collect();
            Tree::new(label).with_leaves(leaves)
        }

        match self.root() {
            Some(root_idx) => build_tree(self, root_idx),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

impl TreeNodeConvert for Hierarchy {
    fn to_tree_string(&self) -> Tree<String> {
        self.tree().to_tree_string()
    }
}
