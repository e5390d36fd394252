use aws_sdk_sqs::{config::Builder as SqsConfigBuilder, Client};
use axum::async_trait;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    connection_string::{ConnectionString, ConnectionStringError},
    users::repo_types::User,
};

pub const USER_QUEUE: &str = "user-queue";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to create queue client")]
    Client(#[source] ConnectionStringError),
    #[error("failed to create sender for user-queue")]
    Sender(#[source] BoxError),
    #[error("failed to marshal user data")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to send message to queue")]
    Send(#[source] BoxError),
}

#[async_trait]
pub trait UserPublisher: Send + Sync {
    async fn publish(&self, user: &User) -> Result<(), PublishError>;
}

/// Publishes to an SQS-compatible queue. Client and queue handle live for one call.
#[derive(Clone)]
pub struct SqsUserPublisher {
    connection_string: String,
}

/// Queue handle resolved from the queue name.
struct Sender {
    client: Client,
    queue_url: String,
}

impl Sender {
    async fn send(&self, body: String) -> Result<(), PublishError> {
        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| PublishError::Send(e.into()))?;
        Ok(())
    }
}

impl SqsUserPublisher {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    async fn client(&self) -> Result<Client, PublishError> {
        let cs = ConnectionString::parse(&self.connection_string).map_err(PublishError::Client)?;
        let shared = cs.sdk_config().await;
        Ok(Client::from_conf(SqsConfigBuilder::from(&shared).build()))
    }

    async fn sender(&self, client: Client) -> Result<Sender, PublishError> {
        let out = client
            .get_queue_url()
            .queue_name(USER_QUEUE)
            .send()
            .await
            .map_err(|e| PublishError::Sender(e.into()))?;
        let queue_url = out
            .queue_url()
            .ok_or_else(|| PublishError::Sender("queue url missing from response".into()))?
            .to_string();
        Ok(Sender { client, queue_url })
    }
}

pub fn user_payload(user: &User) -> Result<String, PublishError> {
    serde_json::to_string(user).map_err(PublishError::Serialize)
}

#[async_trait]
impl UserPublisher for SqsUserPublisher {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn publish(&self, user: &User) -> Result<(), PublishError> {
        let client = self.client().await?;
        let sender = self.sender(client).await?;
        let payload = user_payload(user)?;
        sender.send(payload.clone()).await?;
        info!(%payload, "user data sent to queue");
        Ok(())
    }
}
