//! Error types for record synthesis and artifact staging.

use std::path::PathBuf;

/// Errors that abort record synthesis.
///
/// These indicate caller misuse and are surfaced immediately.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// A candidate value is not a 24 digit hexadecimal identifier
    #[error("Invalid attempt to generate an ObjectId: '{0}'")]
    InvalidIdentifier(String),

    /// Neither a pipeline nor a lists pool was supplied to the composer
    #[error("No reference pool supplied: set either a pipeline or a lists pool")]
    MissingReferencePool,

    /// A reference pool file could not be read or parsed
    #[error("Failed to load reference pool from {path}: {reason}")]
    PoolLoad { path: PathBuf, reason: String },
}

/// Failure to stage a generated artifact into object storage.
///
/// Never raised by the artifact builder; carried in its result so callers
/// decide whether a failed upload matters to them.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Local I/O failed while handing the file to the store
    #[error("I/O error while uploading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store refused or failed the upload
    #[error("Object store rejected upload to bucket '{bucket}': {reason}")]
    Rejected { bucket: String, reason: String },
}
