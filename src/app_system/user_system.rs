use std::sync::Arc;
use tracing::{error, info};

use crate::config::{ApiConfig, Backend, ConfigError};
use crate::presentation::{Notifier, UserDirectory};
use crate::repository::{
    HttpUserRepository, IdAssignment, InMemoryUserRepository, MemoryStoreHandle, PathStyle, SharedUserRepository,
};
use crate::usecases::UserUseCases;

const MEMORY_BUFFER_SIZE: usize = 32;

/// The application system: picks a repository adapter and wires the use-cases.
///
/// Responsible for starting any in-process store, handing out use-cases and
/// directories, and shutting down.
pub struct UserSystem {
    use_cases: UserUseCases<SharedUserRepository>,
    backend: Backend,
    handles: Vec<MemoryStoreHandle>,
}

impl UserSystem {
    /// Builds the system for the configured backend. Must be called inside a
    /// tokio runtime when the memory backend is selected.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ConfigError> {
        let mut handles = Vec::new();

        let repository: SharedUserRepository = match config.backend {
            Backend::Server => Arc::new(
                HttpUserRepository::from_config(config, IdAssignment::Server)?
                    .with_path_style(PathStyle::TrailingSlash),
            ),
            Backend::Placeholder => {
                Arc::new(HttpUserRepository::from_config(config, IdAssignment::placeholder())?)
            }
            Backend::Memory => {
                let (repository, handle) = InMemoryUserRepository::spawn(MEMORY_BUFFER_SIZE);
                handles.push(handle);
                Arc::new(repository)
            }
        };

        info!(backend = %config.backend, base_url = %config.base_url, "User system ready");

        Ok(Self {
            use_cases: UserUseCases::new(repository),
            backend: config.backend,
            handles,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn use_cases(&self) -> UserUseCases<SharedUserRepository> {
        self.use_cases.clone()
    }

    /// A fresh state owner sharing this system's repository.
    pub fn directory<N: Notifier>(&self, notifier: N) -> UserDirectory<SharedUserRepository, N> {
        UserDirectory::new(self.use_cases(), notifier)
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // Use-cases and directories handed out earlier may still be alive;
        // the store is stopped regardless.
        for handle in self.handles {
            if let Err(e) = handle.stop().await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
