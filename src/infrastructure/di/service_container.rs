//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ContainersService, ShellService};
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, Prompt, RealCommandRunner, TerminalPrompt};

/// Container holding the settings, the I/O boundaries and the services
/// built on them.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Interactive question abstraction
    pub prompt: Arc<dyn Prompt>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealCommandRunner), Arc::new(TerminalPrompt))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        cmd: Arc<dyn CommandRunner>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            cmd,
            prompt,
        }
    }

    pub fn containers_service(&self) -> ContainersService {
        ContainersService::new(Arc::clone(&self.cmd), Arc::clone(&self.settings))
    }

    pub fn shell_service(&self) -> ShellService {
        ShellService::new(Arc::clone(&self.cmd), Arc::clone(&self.settings))
    }
}
