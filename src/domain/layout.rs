//! Dendrogram layout: breadth-first leveling and per-level centering.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData as ForceNode, SimulationParameters};
use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::builder::Hierarchy;

/// Vertical distance between two levels.
pub const DEFAULT_LEVEL_HEIGHT: f64 = 2.0;

const FORCE_STEP: f32 = 0.035;

/// Depth -> nodes at that depth, in traversal order.
pub type LevelMap = BTreeMap<usize, Vec<Index>>;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub level_height: f64,
    /// Simulation steps for the force-directed fallback
    pub force_iterations: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            level_height: DEFAULT_LEVEL_HEIGHT,
            force_iterations: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Dendrogram,
    ForceDirected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    pub index: Index,
    pub name: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
}

/// Coordinates for every node of a hierarchy, in breadth-first order.
#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: LayoutKind,
    pub positions: Vec<NodePosition>,
    /// arena index -> slot in `positions`
    by_index: HashMap<Index, usize>,
    by_name: HashMap<String, usize>,
}

impl Layout {
    pub fn new(kind: LayoutKind, positions: Vec<NodePosition>) -> Self {
        let by_index = positions
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.index, slot))
            .collect();
        let by_name = positions
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.name.clone(), slot))
            .collect();
        Self {
            kind,
            positions,
            by_index,
            by_name,
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodePosition> {
        self.by_name.get(name).map(|&slot| &self.positions[slot])
    }

    pub fn position_of(&self, index: Index) -> Option<&NodePosition> {
        self.by_index.get(&index).map(|&slot| &self.positions[slot])
    }

    /// `(min_x, max_x, min_y, max_y)`, all zero for an empty layout.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        if self.positions.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        self.positions.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
        )
    }

    /// Nodes at `depth` in traversal order.
    pub fn level(&self, depth: usize) -> Vec<&NodePosition> {
        self.positions.iter().filter(|p| p.depth == depth).collect()
    }
}

/// Assign each node its depth by breadth-first traversal from the root.
/// Children are discovered in edge-insertion order.
pub fn levels(tree: &TreeArena) -> LevelMap {
    let mut levels = LevelMap::new();
    let Some(root) = tree.root() else {
        return levels;
    };

    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([(root, 0usize)]);
    while let Some((idx, depth)) = queue.pop_front() {
        levels.entry(depth).or_default().push(idx);
        if let Some(node) = tree.get_node(idx) {
            for &child in &node.children {
                if visited.insert(child) {
                    queue.push_back((child, depth + 1));
                }
            }
        }
    }
    levels
}

/// Compute the dendrogram coordinates of `hierarchy`.
///
/// Each level is centered on x = 0 and spread to the width of the widest
/// level: node `i` of `n` sits at `(i - (n-1)/2) * (max_width / n)`, and
/// `y = -depth * level_height`. A tree without edges has no levels to spread
/// and goes through the force-directed fallback instead.
#[instrument(level = "debug", skip_all, fields(nodes = hierarchy.len()))]
pub fn compute_layout(hierarchy: &Hierarchy, options: &LayoutOptions) -> Layout {
    let tree = hierarchy.tree();
    if tree.len() <= 1 {
        debug!("tree without edges, using force-directed layout");
        return force_layout(tree, options);
    }

    let levels = levels(tree);
    let max_width = levels.values().map(Vec::len).max().unwrap_or(1) as f64;
    debug!("levels: {}, widest: {}", levels.len(), max_width);

    let mut positions = Vec::with_capacity(tree.len());
    for (&depth, nodes) in &levels {
        let n = nodes.len() as f64;
        for (i, &idx) in nodes.iter().enumerate() {
            positions.push(NodePosition {
                index: idx,
                name: tree.name(idx).to_string(),
                depth,
                x: (i as f64 - (n - 1.0) / 2.0) * (max_width / n),
                y: -(depth as f64) * options.level_height,
            });
        }
    }

    Layout::new(LayoutKind::Dendrogram, positions)
}

/// Spring simulation seeded on a unit circle, recentered on the origin.
fn force_layout(tree: &TreeArena, options: &LayoutOptions) -> Layout {
    let mut graph: ForceGraph<Index, ()> = ForceGraph::new(SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 3000.0,
        damping_factor: 0.9,
    });

    let nodes: Vec<_> = tree.iter().collect();
    let radius = if nodes.len() > 1 { 1.0 } else { 0.0 };
    let mut handles = HashMap::with_capacity(nodes.len());
    for (i, (idx, _)) in nodes.iter().enumerate() {
        let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
        let handle = graph.add_node(ForceNode {
            x: (radius * angle.cos()) as f32,
            y: (radius * angle.sin()) as f32,
            mass: 10.0,
            is_anchor: false,
            user_data: *idx,
        });
        handles.insert(*idx, handle);
    }
    for (idx, node) in &nodes {
        let Some(parent) = node.parent else { continue };
        if let (Some(&source), Some(&target)) = (handles.get(&parent), handles.get(idx)) {
            graph.add_edge(source, target, EdgeData::default());
        }
    }

    for _ in 0..options.force_iterations {
        graph.update(FORCE_STEP);
    }

    let mut raw = Vec::with_capacity(nodes.len());
    graph.visit_nodes(|node| {
        raw.push((node.data.user_data, node.x() as f64, node.y() as f64));
    });
    let count = raw.len().max(1) as f64;
    let (cx, cy) = raw
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (_, x, y)| (sx + x, sy + y));
    let (cx, cy) = (cx / count, cy / count);

    let depths: HashMap<Index, usize> = levels(tree)
        .into_iter()
        .flat_map(|(depth, nodes)| nodes.into_iter().map(move |idx| (idx, depth)))
        .collect();
    let positions = raw
        .into_iter()
        .map(|(idx, x, y)| NodePosition {
            index: idx,
            name: tree.name(idx).to_string(),
            depth: depths.get(&idx).copied().unwrap_or(0),
            x: x - cx,
            y: y - cy,
        })
        .collect();

    Layout::new(LayoutKind::ForceDirected, positions)
}
