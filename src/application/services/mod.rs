//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Viewer)
//! but are themselves concrete structs, not traits.

mod organigram;
pub mod roster;

pub use organigram::OrganigramService;
pub use roster::parse_roster;
