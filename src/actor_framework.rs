use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::future::Future;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with lifecycle hooks)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> { Ok(()) }
}

/// Failures reported by a [`ResourceClient`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected by entity: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(self) {
        self.run_until(std::future::pending()).await
    }

    /// Processes requests until every client has been dropped or `shutdown`
    /// resolves, whichever comes first.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) {
        debug!("Resource actor starting");
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                _ = &mut shutdown => {
                    debug!("Shutdown requested");
                    break;
                }
            }
        }
        debug!("Resource actor stopped");
    }

    fn handle(&mut self, msg: ResourceRequest<T>) {
        match msg {
            ResourceRequest::Create { payload, respond_to } => {
                let _ = respond_to.send(self.handle_create(payload));
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get(&id).cloned();
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::List { respond_to } => {
                let items = self.store.values().cloned().collect();
                let _ = respond_to.send(Ok(items));
            }
            ResourceRequest::Update { id, patch, respond_to } => {
                let _ = respond_to.send(self.handle_update(id, patch));
            }
            ResourceRequest::Delete { id, respond_to } => {
                let _ = respond_to.send(self.handle_delete(id));
            }
        }
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id, payload).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.store.insert(item.id().clone(), item.clone());
        Ok(item)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(patch).map_err(FrameworkError::Rejected)?;
        Ok(item.clone())
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        self.store.remove(&id);
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
