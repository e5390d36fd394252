use aws_sdk_s3::{config::Builder as S3ConfigBuilder, Client};
use aws_smithy_types::byte_stream::ByteStream;
use axum::async_trait;
use thiserror::Error;
use tracing::{info, instrument};

use crate::connection_string::{ConnectionString, ConnectionStringError};

pub const PROFILE_PICTURES_CONTAINER: &str = "profile-pictures";

// FIXME: every upload is tagged image/jpeg whatever the part actually contains.
const PROFILE_PICTURE_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to create blob client")]
    Client(#[source] ConnectionStringError),
    #[error("failed to upload to blob")]
    Transfer(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `body` as `name` in the profile picture container and returns its reference.
    async fn upload(&self, name: &str, body: ByteStream) -> Result<String, UploadError>;
}

pub fn blob_reference(name: &str) -> String {
    format!("{}/{}", PROFILE_PICTURES_CONTAINER, name)
}

/// S3-compatible object storage. The client is built on every upload.
#[derive(Clone)]
pub struct S3BlobStore {
    connection_string: String,
}

impl S3BlobStore {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    async fn client(&self) -> Result<Client, UploadError> {
        let cs = ConnectionString::parse(&self.connection_string).map_err(UploadError::Client)?;
        let shared = cs.sdk_config().await;
        let conf = S3ConfigBuilder::from(&shared)
            .force_path_style(cs.endpoint.is_some())
            .build();
        Ok(Client::from_conf(conf))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, body), fields(size = body.size_hint().0))]
    async fn upload(&self, name: &str, body: ByteStream) -> Result<String, UploadError> {
        let client = self.client().await?;
        client
            .put_object()
            .bucket(PROFILE_PICTURES_CONTAINER)
            .key(name)
            .body(body)
            .metadata("ContentType", PROFILE_PICTURE_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.into()))?;

        let reference = blob_reference(name);
        info!(%reference, "profile picture uploaded");
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_reference() {
        assert_eq!(blob_reference("me.png"), "profile-pictures/me.png");
    }

    #[tokio::test]
    async fn test_upload_with_unusable_connection_string() {
        let store = S3BlobStore::new("");
        let err = store.upload("a.jpg", ByteStream::from_static(b"x")).await.unwrap_err();
        assert!(matches!(err, UploadError::Client(ConnectionStringError::Empty)));

        let store = S3BlobStore::new("Endpoint=http://localhost:9000;AccessKeyId=k");
        let err = store.upload("a.jpg", ByteStream::from_static(b"x")).await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Client(ConnectionStringError::MissingKey("SecretAccessKey"))
        ));
    }
}
