//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, SeedService, TreeSession, TreeStore};
use crate::config::Settings;
use crate::domain::{default_seed, TreeNode};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub seeds: SeedService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let seeds = SeedService::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            seeds,
        }
    }

    /// Initial root sequence: the configured seed file, else the built-in tree.
    #[instrument(level = "debug", skip(self))]
    pub fn seed(&self) -> ApplicationResult<Vec<TreeNode>> {
        match &self.settings.seed_path {
            Some(path) => self.seeds.load(path),
            None => {
                debug!(root_label = %self.settings.root_label, "using built-in seed");
                Ok(default_seed(&self.settings.root_label))
            }
        }
    }

    /// Fresh store-backed session over the initial tree.
    pub fn session(&self) -> ApplicationResult<TreeSession> {
        Ok(TreeSession::new(TreeStore::new(self.seed()?)))
    }
}
