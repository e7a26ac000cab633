//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::OrganigramService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, SystemViewer, Viewer};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Opens rendered diagrams
    pub viewer: Arc<dyn Viewer>,

    /// Load/build/render pipeline
    pub organigram: Arc<OrganigramService>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SystemViewer))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>, viewer: Arc<dyn Viewer>) -> Self {
        let settings = Arc::new(settings);
        let organigram = Arc::new(OrganigramService::new(fs.clone(), settings.clone()));

        Self {
            settings,
            fs,
            viewer,
            organigram,
        }
    }
}
