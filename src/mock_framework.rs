//! # Mock Framework
//!
//! Utilities for testing resource clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_update`] to assert behavior.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

type Responder<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// Requests sent by the client land on `receiver` instead of a running
/// `ResourceActor`, so a test can inspect them and answer with success,
/// failure, or by dropping the responder.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateUserInput, User};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move {
            let input = CreateUserInput::new("Test", "test@example.com", "test");
            client.create(input).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.username, "test");

        let stored = User {
            id: 1,
            name: payload.name,
            email: payload.email,
            username: payload.username,
            phone: None,
            website: None,
        };
        responder.send(Ok(stored.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(stored));
    }

    #[tokio::test]
    async fn test_unexpected_message_yields_none() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        tokio::spawn(async move { client.list().await });

        assert!(expect_get(&mut receiver).await.is_none());
    }
}
