//! Object storage for staged artifacts.

use crate::error::UploadError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Where an uploaded artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub bucket: String,
    /// Path of the object inside its bucket
    pub path: String,
}

/// Destination for staged document files
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `local_path` under a key namespaced by project and file name
    async fn put_document(
        &self,
        bucket: &str,
        project_id: &str,
        original_file_name: &str,
        local_path: &Path,
    ) -> Result<ArtifactLocation, UploadError>;
}

/// Object key for a project's document
pub fn object_key(project_id: &str, original_file_name: &str) -> String {
    format!("{}/{}", project_id, original_file_name.replace(['/', '\\'], "_"))
}

/// Store that keeps one directory per bucket under a root directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of an object
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_document(
        &self,
        bucket: &str,
        project_id: &str,
        original_file_name: &str,
        local_path: &Path,
    ) -> Result<ArtifactLocation, UploadError> {
        let key = object_key(project_id, original_file_name);
        let target = self.object_path(bucket, &key);
        let io_err = |source| UploadError::Io {
            path: local_path.to_path_buf(),
            source,
        };

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::copy(local_path, &target).await.map_err(io_err)?;

        Ok(ArtifactLocation {
            bucket: bucket.to_string(),
            path: key,
        })
    }
}

#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;

#[cfg(feature = "s3")]
mod s3 {
    use super::{object_key, ArtifactLocation, ObjectStore};
    use crate::error::UploadError;
    use async_trait::async_trait;
    use aws_config::BehaviorVersion;
    use aws_sdk_s3::primitives::ByteStream;
    use std::path::Path;

    /// Store backed by S3 or an S3-compatible service such as MinIO
    pub struct S3ObjectStore {
        client: aws_sdk_s3::Client,
    }

    impl S3ObjectStore {
        /// Create a store from the ambient AWS configuration
        pub async fn new() -> Self {
            let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            Self::from_client(aws_sdk_s3::Client::new(&sdk_config))
        }

        pub fn from_client(client: aws_sdk_s3::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl ObjectStore for S3ObjectStore {
        async fn put_document(
            &self,
            bucket: &str,
            project_id: &str,
            original_file_name: &str,
            local_path: &Path,
        ) -> Result<ArtifactLocation, UploadError> {
            let key = object_key(project_id, original_file_name);
            let rejected = |reason: String| UploadError::Rejected {
                bucket: bucket.to_string(),
                reason,
            };

            let body = ByteStream::from_path(local_path)
                .await
                .map_err(|e| rejected(e.to_string()))?;

            self.client
                .put_object()
                .bucket(bucket)
                .key(&key)
                .content_type("application/pdf")
                .body(body)
                .send()
                .await
                .map_err(|e| rejected(e.to_string()))?;

            tracing::debug!("Uploaded {} to s3://{}/{}", local_path.display(), bucket, key);

            Ok(ArtifactLocation {
                bucket: bucket.to_string(),
                path: key,
            })
        }
    }
}
