//! Persistence port for users and its interchangeable adapters.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CreateUserInput, UpdateUserInput, User, UserId};
use crate::error::UserResult;

pub use http::{HttpUserRepository, IdAssignment, PathStyle};
pub use memory::{InMemoryUserRepository, MemoryStoreHandle};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user in the collection
    async fn get_all(&self) -> UserResult<Vec<User>>;

    /// Get a user by ID. Any failure is reported as `None`.
    async fn get_by_id(&self, id: UserId) -> Option<User>;

    /// Create a user and return the stored record
    async fn create(&self, input: CreateUserInput) -> UserResult<User>;

    /// Apply a partial update and return the stored record
    async fn update(&self, input: UpdateUserInput) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: UserId) -> UserResult<()>;
}

/// Repository selected at runtime.
pub type SharedUserRepository = Arc<dyn UserRepository>;

#[async_trait]
impl<R: UserRepository + ?Sized> UserRepository for Arc<R> {
    async fn get_all(&self) -> UserResult<Vec<User>> {
        (**self).get_all().await
    }

    async fn get_by_id(&self, id: UserId) -> Option<User> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, input: CreateUserInput) -> UserResult<User> {
        (**self).create(input).await
    }

    async fn update(&self, input: UpdateUserInput) -> UserResult<User> {
        (**self).update(input).await
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        (**self).delete(id).await
    }
}
