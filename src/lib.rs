//! # User Manager
//!
//! Client-side management of user records held by a remote REST collection.
//!
//! ## Layers
//!
//! - **Domain types** - the record and its create/update payloads → [`User`], [`CreateUserInput`], [`UpdateUserInput`]
//! - **Repository port** - async persistence contract → [`UserRepository`]
//!     - [`HttpUserRepository`] talks to `{base}/users`
//!     - [`InMemoryUserRepository`] keeps records in a resource actor
//! - **Use-cases** - validation in front of the port → [`UserUseCases`]
//! - **Presentation state** - local list, selection and notifications → [`UserDirectory`]
//! - **System coordinator** - adapter selection from configuration → [`UserSystem`]
//!
//! ## Example Usage
//!
//! ```ignore
//! let config = ApiConfig::from_env()?;
//! let system = UserSystem::from_config(&config)?;
//!
//! let user = system
//!     .use_cases()
//!     .create_user(CreateUserInput::new("Alice", "alice@example.com", "alice"))
//!     .await?;
//!
//! system.shutdown().await?;
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod config;
pub mod domain;
pub mod error;
pub mod presentation;
pub mod repository;
pub mod usecases;
mod user_actor;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, UserSystem};
pub use config::{ApiConfig, Backend, ConfigError, FromEnv};
pub use domain::{CreateUserInput, UpdateUserInput, User, UserId};
pub use error::{UserError, UserResult};
pub use presentation::{Notification, NotificationLevel, Notifier, Submission, TracingNotifier, UserDirectory};
pub use repository::{
    HttpUserRepository, IdAssignment, InMemoryUserRepository, MemoryStoreHandle, PathStyle, SharedUserRepository,
    UserRepository,
};
pub use usecases::UserUseCases;
