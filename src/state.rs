use crate::config::AppConfig;
use crate::queue::{SqsUserPublisher, UserPublisher};
use crate::storage::{BlobStore, S3BlobStore};
use crate::users::repo::{PgUserStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub publisher: Arc<dyn UserPublisher>,
}

impl AppState {
    pub fn from_config(config: &AppConfig, db: PgPool) -> Self {
        Self::from_parts(
            Arc::new(PgUserStore::new(db)),
            Arc::new(S3BlobStore::new(&config.cloud.blob_connection_string)),
            Arc::new(SqsUserPublisher::new(
                &config.cloud.service_bus_connection_string,
            )),
        )
    }

    pub fn from_parts(
        store: Arc<dyn UserStore>,
        blobs: Arc<dyn BlobStore>,
        publisher: Arc<dyn UserPublisher>,
    ) -> Self {
        Self {
            store,
            blobs,
            publisher,
        }
    }
}

#[cfg(test)]
pub mod fakes {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use aws_smithy_types::byte_stream::ByteStream;
    use axum::async_trait;

    use super::AppState;
    use crate::connection_string::ConnectionStringError;
    use crate::queue::{PublishError, UserPublisher};
    use crate::storage::{blob_reference, BlobStore, UploadError};
    use crate::users::repo::{StorageError, UserStore};
    use crate::users::repo_types::User;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreFailure {
        Query,
        Scan,
    }

    #[derive(Default)]
    pub struct FakeStore {
        pub rows: Vec<User>,
        pub fail: Option<StoreFailure>,
    }

    #[async_trait]
    impl UserStore for FakeStore {
        async fn list_users(&self) -> Result<Vec<User>, StorageError> {
            match self.fail {
                Some(StoreFailure::Query) => Err(StorageError::Query(sqlx::Error::PoolTimedOut)),
                Some(StoreFailure::Scan) => Err(StorageError::Scan(sqlx::Error::ColumnNotFound(
                    "created_at".into(),
                ))),
                None => Ok(self.rows.clone()),
            }
        }
    }

    #[derive(Default)]
    pub struct FakeBlobs {
        pub fail: bool,
        pub calls: AtomicUsize,
        pub objects: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FakeBlobs {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn names(&self) -> Vec<String> {
            self.objects.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
        }

        pub fn body(&self, name: &str) -> Option<Vec<u8>> {
            self.objects
                .lock()
                .unwrap()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, b)| b.clone())
        }
    }

    #[async_trait]
    impl BlobStore for FakeBlobs {
        async fn upload(&self, name: &str, body: ByteStream) -> Result<String, UploadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UploadError::Transfer("connection reset".into()));
            }
            let data = body
                .collect()
                .await
                .map_err(|e| UploadError::Transfer(e.into()))?
                .into_bytes()
                .to_vec();
            self.objects.lock().unwrap().push((name.to_string(), data));
            Ok(blob_reference(name))
        }
    }

    #[derive(Default)]
    pub struct FakePublisher {
        pub fail: bool,
        pub sent: Mutex<Vec<User>>,
        pub calls: AtomicUsize,
    }

    impl FakePublisher {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserPublisher for FakePublisher {
        async fn publish(&self, user: &User) -> Result<(), PublishError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PublishError::Client(ConnectionStringError::Empty));
            }
            self.sent.lock().unwrap().push(user.clone());
            Ok(())
        }
    }

    pub struct Harness {
        pub state: AppState,
        pub blobs: Arc<FakeBlobs>,
        pub publisher: Arc<FakePublisher>,
    }

    pub fn harness(store: FakeStore, blobs: FakeBlobs, publisher: FakePublisher) -> Harness {
        let blobs = Arc::new(blobs);
        let publisher = Arc::new(publisher);
        let state = AppState::from_parts(Arc::new(store), blobs.clone(), publisher.clone());
        Harness {
            state,
            blobs,
            publisher,
        }
    }
}
