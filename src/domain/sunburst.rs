//! Flattening of the hierarchy into sunburst chart columns.

use serde::Serialize;

use crate::domain::builder::Hierarchy;

/// Parallel `ids` / `labels` / `parents` sequences of a sunburst trace.
///
/// The root comes first with an empty parent; the remaining nodes follow in
/// pre-order, children in edge-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SunburstData {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
}

impl SunburstData {
    pub fn from_hierarchy(hierarchy: &Hierarchy) -> Self {
        let tree = hierarchy.tree();
        let mut data = Self::default();
        for (_, node) in tree.iter() {
            let name = node.data.name.clone();
            let parent = node
                .parent
                .map(|p| tree.name(p).to_string())
                .unwrap_or_default();
            data.ids.push(name.clone());
            data.labels.push(name);
            data.parents.push(parent);
        }
        data
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
