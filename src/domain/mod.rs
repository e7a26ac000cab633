//! Domain layer: entities and hierarchy logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod layout;
pub mod sunburst;

pub use arena::{NodeData, NodeKind, TreeArena, TreeNode};
pub use builder::{Hierarchy, HierarchyBuilder, HierarchyOptions, RootFallback, DEFAULT_ROOT_LABEL};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{compute_layout, levels, Layout, LayoutKind, LayoutOptions, NodePosition};
pub use sunburst::SunburstData;
