//! Organigram: reporting lines read from CSV, assembled into a single-rooted
//! tree and rendered as a sunburst page, a dendrogram and a text tree.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
