//! Hierarchy builder: reporting lines to a rooted tree.

use std::collections::{HashMap, HashSet, VecDeque};

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::arena::{NodeData, NodeKind, TreeArena};
use crate::domain::entities::Person;
use crate::domain::error::{DomainError, DomainResult};

/// Label of the synthetic root that joins several top-level people.
pub const DEFAULT_ROOT_LABEL: &str = "Schalke 04";

/// What to do when no top-level person exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootFallback {
    /// Lexicographically smallest supervisor becomes root, its own
    /// supervisor link is dropped.
    #[default]
    FirstSorted,
    /// Fail with [`DomainError::NoTopLevel`].
    Reject,
}

/// Options for root resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyOptions {
    pub root_label: String,
    /// Put the sentinel on top even above a lone listed top-level person
    pub always_synthesize_root: bool,
    pub fallback: RootFallback,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            always_synthesize_root: false,
            fallback: RootFallback::default(),
        }
    }
}

/// Rooted reporting hierarchy.
#[derive(Debug)]
pub struct Hierarchy {
    tree: TreeArena,
    index: HashMap<String, Index>,
    top_level: Vec<String>,
    fallback_used: bool,
}

impl Hierarchy {
    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    /// Index of the root; a built hierarchy is never empty.
    pub fn root(&self) -> Option<Index> {
        self.tree.root()
    }

    pub fn root_name(&self) -> &str {
        self.root().map(|r| self.tree.name(r)).unwrap_or_default()
    }

    pub fn is_synthetic_root(&self) -> bool {
        self.root()
            .and_then(|r| self.tree.get_node(r))
            .is_some_and(|n| n.data.kind == NodeKind::Sentinel)
    }

    /// People resolved as top level, before any sentinel is added.
    pub fn top_level(&self) -> &[String] {
        &self.top_level
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback_used
    }

    pub fn get(&self, name: &str) -> Option<Index> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn edges(&self) -> Vec<(String, String)> {
        self.tree.edges()
    }

    pub fn children_of(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .and_then(|idx| self.tree.get_node(idx))
            .map(|node| {
                node.children
                    .iter()
                    .map(|&c| self.tree.name(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parent_of(&self, name: &str) -> Option<&str> {
        let node = self.tree.get_node(self.get(name)?)?;
        node.parent.map(|p| self.tree.name(p))
    }
}

/// Edges and identities collected from the input rows.
#[derive(Debug, Default)]
struct ReportingLines {
    /// Listed people in row order
    employees: Vec<String>,
    /// Supervisor names in order of first appearance
    supervisors: Vec<String>,
    supervisor_of: HashMap<String, Option<String>>,
    /// supervisor -> reports, in row order
    reports: HashMap<String, Vec<String>>,
}

impl ReportingLines {
    fn collect(people: &[Person]) -> DomainResult<Self> {
        let mut lines = Self::default();
        let mut seen_supervisors = HashSet::new();

        for person in people {
            let name = person.full_name();
            match lines.supervisor_of.get(&name) {
                Some(existing) if *existing == person.supervisor => {
                    warn!("duplicate row ignored: {}", person);
                    continue;
                }
                Some(_) => return Err(DomainError::DuplicatePerson { name }),
                None => {}
            }

            lines
                .supervisor_of
                .insert(name.clone(), person.supervisor.clone());
            lines.employees.push(name.clone());

            if let Some(supervisor) = &person.supervisor {
                if seen_supervisors.insert(supervisor.clone()) {
                    lines.supervisors.push(supervisor.clone());
                }
                lines
                    .reports
                    .entry(supervisor.clone())
                    .or_default()
                    .push(name);
            }
        }
        Ok(lines)
    }

    fn is_listed(&self, name: &str) -> bool {
        self.supervisor_of.contains_key(name)
    }

    /// Supervisors without a row, then listed people without a supervisor.
    fn top_level_candidates(&self) -> Vec<String> {
        let unlisted = self
            .supervisors
            .iter()
            .filter(|s| !self.is_listed(s))
            .cloned();
        let unsupervised = self
            .employees
            .iter()
            .filter(|e| matches!(self.supervisor_of.get(*e), Some(None)))
            .cloned();
        unlisted.chain(unsupervised).collect()
    }

    fn reports_of(&self, name: &str) -> &[String] {
        self.reports.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every name that must end up in the tree, listed people first.
    fn all_names(&self) -> impl Iterator<Item = &String> {
        self.employees
            .iter()
            .chain(self.supervisors.iter().filter(|s| !self.is_listed(s)))
    }
}

/// Constructs a rooted [`Hierarchy`] from validated input rows.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    options: HierarchyOptions,
}

impl HierarchyBuilder {
    pub fn new(options: HierarchyOptions) -> Self {
        Self { options }
    }

    /// Build the tree: collect edges, resolve the root, assemble breadth-first.
    #[instrument(level = "debug", skip(self, people), fields(rows = people.len()))]
    pub fn build(&self, people: &[Person]) -> DomainResult<Hierarchy> {
        if people.is_empty() {
            return Err(DomainError::EmptyHierarchy);
        }
        let lines = ReportingLines::collect(people)?;

        let mut top_level = lines.top_level_candidates();
        let mut dropped_edge = None;
        let fallback_used = top_level.is_empty();
        if fallback_used {
            let root = self.fallback_root(&lines)?;
            if let Some(Some(supervisor)) = lines.supervisor_of.get(&root) {
                warn!(
                    "no top-level person, using {} as root and ignoring its supervisor {}",
                    root, supervisor
                );
                dropped_edge = Some((supervisor.clone(), root.clone()));
            }
            top_level.push(root);
        }
        debug!("top level: {:?}", top_level);

        // a lone listed person without supervisor is the only direct root
        let has_unlisted = top_level.iter().any(|name| !lines.is_listed(name));
        let synthesize =
            top_level.len() > 1 || has_unlisted || self.options.always_synthesize_root;
        let root = if synthesize {
            let label = &self.options.root_label;
            if lines.is_listed(label) || lines.reports.contains_key(label) {
                return Err(DomainError::SentinelCollision(label.clone()));
            }
            NodeData {
                name: label.clone(),
                kind: NodeKind::Sentinel,
            }
        } else {
            let name = top_level[0].clone();
            let kind = if lines.is_listed(&name) {
                NodeKind::Listed
            } else {
                NodeKind::Unlisted
            };
            NodeData { name, kind }
        };

        let (tree, index) = Self::assemble(&lines, root, &top_level, dropped_edge.as_ref())?;
        Ok(Hierarchy {
            tree,
            index,
            top_level,
            fallback_used,
        })
    }

    fn fallback_root(&self, lines: &ReportingLines) -> DomainResult<String> {
        match self.options.fallback {
            RootFallback::Reject => Err(DomainError::NoTopLevel),
            RootFallback::FirstSorted => lines
                .supervisors
                .iter()
                .min()
                .cloned()
                .ok_or(DomainError::NoTopLevel),
        }
    }

    /// Breadth-first assembly; children keep row order. A node reached twice,
    /// or a node never reached, means the reporting lines contain a cycle.
    fn assemble(
        lines: &ReportingLines,
        root: NodeData,
        top_level: &[String],
        dropped_edge: Option<&(String, String)>,
    ) -> DomainResult<(TreeArena, HashMap<String, Index>)> {
        let mut tree = TreeArena::new();
        let mut index = HashMap::new();
        let mut queue = VecDeque::new();

        let is_sentinel = root.kind == NodeKind::Sentinel;
        let root_name = root.name.clone();
        let root_idx = tree.insert_node(root, None);
        if is_sentinel {
            queue.extend(top_level.iter().map(|name| (name.clone(), root_idx)));
        } else {
            index.insert(root_name.clone(), root_idx);
            Self::enqueue_reports(lines, &root_name, root_idx, dropped_edge, &mut queue);
        }

        while let Some((name, parent_idx)) = queue.pop_front() {
            if index.contains_key(&name) {
                return Err(DomainError::CycleDetected(name));
            }
            let kind = if lines.is_listed(&name) {
                NodeKind::Listed
            } else {
                NodeKind::Unlisted
            };
            let idx = tree.insert_node(
                NodeData {
                    name: name.clone(),
                    kind,
                },
                Some(parent_idx),
            );
            index.insert(name.clone(), idx);
            Self::enqueue_reports(lines, &name, idx, dropped_edge, &mut queue);
        }

        if let Some(unreached) = lines.all_names().find(|n| !index.contains_key(*n)) {
            return Err(DomainError::CycleDetected(unreached.clone()));
        }
        if is_sentinel {
            index.insert(root_name, root_idx);
        }

        Ok((tree, index))
    }

    fn enqueue_reports(
        lines: &ReportingLines,
        name: &str,
        idx: Index,
        dropped_edge: Option<&(String, String)>,
        queue: &mut VecDeque<(String, Index)>,
    ) {
        for report in lines.reports_of(name) {
            if dropped_edge.is_some_and(|(s, e)| s == name && e == report) {
                continue;
            }
            queue.push_back((report.clone(), idx));
        }
    }
}
