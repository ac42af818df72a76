//! In-process user repository backed by the generic resource actor.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, instrument, warn};

use super::UserRepository;
use crate::actor_framework::{FrameworkError, ResourceActor, ResourceClient};
use crate::domain::{CreateUserInput, UpdateUserInput, User, UserId};
use crate::error::{UserError, UserResult};

/// Repository that keeps users in a [`ResourceActor`].
#[derive(Clone)]
pub struct InMemoryUserRepository {
    inner: ResourceClient<User>,
}

impl InMemoryUserRepository {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// Starts a user actor with sequential ids beginning at 1.
    pub fn spawn(buffer_size: usize) -> (Self, MemoryStoreHandle) {
        let id_counter = Arc::new(AtomicI64::new(1));
        let next_id = move || id_counter.fetch_add(1, Ordering::SeqCst);

        let (actor, client) = ResourceActor::<User>::new(buffer_size, next_id);
        let (shutdown, stop_requested) = oneshot::channel();
        // A dropped handle detaches the actor instead of stopping it.
        let task = tokio::spawn(actor.run_until(async move {
            if stop_requested.await.is_err() {
                std::future::pending::<()>().await;
            }
        }));

        (Self::new(client), MemoryStoreHandle { shutdown, task })
    }
}

/// Stop switch for a spawned in-memory store.
#[derive(Debug)]
pub struct MemoryStoreHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MemoryStoreHandle {
    /// Stops the actor even while repositories still point at it. Later
    /// calls through those repositories fail with a transport error.
    pub async fn stop(self) -> Result<(), JoinError> {
        let _ = self.shutdown.send(());
        self.task.await
    }
}

impl From<FrameworkError> for UserError {
    fn from(err: FrameworkError) -> Self {
        let status = match err {
            FrameworkError::NotFound(_) => Some(404),
            FrameworkError::Rejected(_) => Some(422),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => None,
        };
        UserError::transport(status, err.to_string())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> UserResult<Vec<User>> {
        debug!("Sending request");
        Ok(self.inner.list().await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: UserId) -> Option<User> {
        debug!("Sending request");
        self.inner.get(id).await.unwrap_or_else(|e| {
            warn!(error = %e, "Fetching user failed, treating as absent");
            None
        })
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    async fn create(&self, input: CreateUserInput) -> UserResult<User> {
        debug!("Sending request");
        Ok(self.inner.create(input).await?)
    }

    #[instrument(skip(self, input), fields(user_id = input.id))]
    async fn update(&self, input: UpdateUserInput) -> UserResult<User> {
        debug!("Sending request");
        Ok(self.inner.update(input.id, input).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> UserResult<()> {
        debug!("Sending request");
        Ok(self.inner.delete(id).await?)
    }
}
