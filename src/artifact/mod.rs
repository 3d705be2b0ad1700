//! Cached test artifacts.
//!
//! Builds one filler PDF per size tier on first demand and keeps it on disk,
//! so repeated test runs reuse earlier work. Per-document copies are staged
//! in a temporary project directory, optionally uploaded, and removed again
//! unless the caller asks to keep them.
//!
//! The presence of a tier's cache file is the only cache state. There is no
//! lock: concurrent builders of the same tier each write a private temporary
//! file and rename it into place.

pub mod pdf;
pub mod store;

use crate::error::UploadError;
use crate::identity::ObjectId;
use crate::provider::{choose, ValueProvider};
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use store::{object_key, ArtifactLocation, LocalObjectStore, ObjectStore};
#[cfg(feature = "s3")]
pub use store::S3ObjectStore;

/// Bucket documents are staged into
pub const DOCUMENTS_BUCKET: &str = "uploads";

/// Internal URL reported when staging did not happen or failed
pub const UPLOAD_FAILED_URL: &str = "upload did not succeed";

pub const ARTIFACT_EXTENSION: &str = "pdf";
pub const ARTIFACT_MIME_TYPE: &str = "application/pdf";

const GUID_MIN: u64 = 1_000_000_000_000_000_000;
const GUID_MAX: u64 = 9_999_999_999_999_999_999;

/// Artifact size classes, sized after representative real uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];

    /// Filler pages in this tier's document
    pub fn pages(&self) -> usize {
        match self {
            SizeTier::Small => 3,
            SizeTier::Medium => 25,
            SizeTier::Large => 120,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self, ARTIFACT_EXTENSION)
    }

    /// Any tier, with equal odds
    pub fn random(provider: &mut dyn ValueProvider) -> Self {
        *choose(provider, &Self::ALL).unwrap_or(&SizeTier::Small)
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeTier::Small => write!(f, "Small"),
            SizeTier::Medium => write!(f, "Medium"),
            SizeTier::Large => write!(f, "Large"),
        }
    }
}

impl std::str::FromStr for SizeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(SizeTier::Small),
            "medium" | "m" => Ok(SizeTier::Medium),
            "large" | "l" => Ok(SizeTier::Large),
            _ => Err(format!(
                "Unknown size tier: {}. Use small, medium, or large",
                s
            )),
        }
    }
}

/// How a per-document copy is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Upload the copy to object storage
    pub stage: bool,
    /// Keep the local copy afterwards
    pub persist: bool,
}

/// A per-document copy of a cached artifact
#[derive(Debug)]
pub struct MaterializedArtifact {
    pub tier: SizeTier,
    pub extension: &'static str,
    pub mime_type: &'static str,
    pub size_bytes: u64,
    pub original_file_name: String,
    /// Name of the per-document copy, `<guid>.pdf`
    pub storage_file_name: String,
    /// Local copy, present only when persisted
    pub local_path: Option<PathBuf>,
    /// Outcome of staging; `None` when staging was not requested
    pub upload: Option<Result<ArtifactLocation, UploadError>>,
}

impl MaterializedArtifact {
    /// Stored object path, or [`UPLOAD_FAILED_URL`]
    pub fn internal_url(&self) -> String {
        match &self.upload {
            Some(Ok(location)) => location.path.clone(),
            _ => UPLOAD_FAILED_URL.to_string(),
        }
    }

    pub fn upload_failed(&self) -> bool {
        matches!(self.upload, Some(Err(_)))
    }
}

/// Manager for cached artifacts and their per-document copies
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    cache_dir: PathBuf,
    temp_root: PathBuf,
}

impl ArtifactCache {
    /// Create a cache with the default directories
    pub fn new() -> Result<Self> {
        Self::with_dirs(Self::default_cache_dir(), Self::default_temp_root())
    }

    /// Create a cache with custom directories
    pub fn with_dirs(cache_dir: PathBuf, temp_root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create artifact cache directory: {}", cache_dir.display())
        })?;
        fs::create_dir_all(&temp_root).with_context(|| {
            format!("Failed to create temp directory: {}", temp_root.display())
        })?;
        Ok(Self {
            cache_dir,
            temp_root,
        })
    }

    /// Working directory for per-document copies
    pub fn default_temp_root() -> PathBuf {
        std::env::temp_dir().join("doc-factory")
    }

    /// Directory holding one file per size tier
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|dir| dir.join("doc-factory"))
            .unwrap_or_else(Self::default_temp_root)
            .join("generated-docs")
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    pub fn cache_path(&self, tier: SizeTier) -> PathBuf {
        self.cache_dir.join(tier.file_name())
    }

    pub fn is_cached(&self, tier: SizeTier) -> bool {
        self.cache_path(tier).exists()
    }

    /// Per-project directory for temporary copies
    pub fn project_temp_dir(&self, project_id: &ObjectId) -> PathBuf {
        self.temp_root.join(project_id.to_hex())
    }

    /// Build the tier's artifact unless it is already cached.
    ///
    /// Expensive for large tiers; everything else reuses the result.
    pub fn ensure_cached_artifact(&self, tier: SizeTier) -> Result<PathBuf> {
        let path = self.cache_path(tier);
        if path.exists() {
            tracing::debug!("Artifact cache hit for {} tier", tier);
            return Ok(path);
        }

        tracing::info!("Building {} artifact ({} pages)", tier, tier.pages());
        let mut staging = tempfile::NamedTempFile::new_in(&self.cache_dir)
            .context("Failed to create temporary artifact file")?;
        let written = pdf::write_filler_document(
            &mut staging,
            tier.pages(),
            &pdf::DocumentInfo::default(),
        )
        .context("Failed to write artifact")?;
        staging
            .persist(&path)
            .with_context(|| format!("Failed to move artifact into {}", path.display()))?;

        tracing::info!("Cached {} artifact at {} ({} bytes)", tier, path.display(), written);
        Ok(path)
    }

    /// Build every tier that is not cached yet
    pub fn ensure_all(&self) -> Result<Vec<PathBuf>> {
        SizeTier::ALL
            .iter()
            .map(|tier| self.ensure_cached_artifact(*tier))
            .collect()
    }

    /// Size of a cached tier in bytes, if built
    pub fn cached_size(&self, tier: SizeTier) -> Option<u64> {
        fs::metadata(self.cache_path(tier)).ok().map(|m| m.len())
    }

    /// Remove all cached tiers, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for tier in SizeTier::ALL {
            let path = self.cache_path(tier);
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Copy a tier's artifact for one document and optionally stage it.
    ///
    /// A failed upload is reported in the result, not as an error. The local
    /// copy is removed once the upload has finished, whatever its outcome,
    /// unless `options.persist` is set. Only local I/O failures are errors.
    pub async fn materialize_for_document(
        &self,
        tier: SizeTier,
        project_id: &ObjectId,
        original_file_name: &str,
        options: MaterializeOptions,
        store: Option<&dyn ObjectStore>,
        provider: &mut dyn ValueProvider,
    ) -> Result<MaterializedArtifact> {
        let template = self.ensure_cached_artifact(tier)?;
        let size_bytes = fs::metadata(&template)
            .with_context(|| format!("Failed to read metadata: {}", template.display()))?
            .len();

        let project_dir = self.project_temp_dir(project_id);
        fs::create_dir_all(&project_dir).with_context(|| {
            format!("Failed to create project directory: {}", project_dir.display())
        })?;

        let guid = provider.number(GUID_MIN, GUID_MAX);
        let storage_file_name = format!("{}.{}", guid, ARTIFACT_EXTENSION);
        let temp_path = project_dir.join(&storage_file_name);
        fs::copy(&template, &temp_path)
            .with_context(|| format!("Failed to copy artifact to {}", temp_path.display()))?;

        let upload = match (options.stage, store) {
            (true, Some(store)) => Some(
                store
                    .put_document(
                        DOCUMENTS_BUCKET,
                        &project_id.to_hex(),
                        original_file_name,
                        &temp_path,
                    )
                    .await,
            ),
            (true, None) => {
                tracing::warn!("Staging requested but no object store configured");
                None
            }
            (false, _) => None,
        };

        match &upload {
            Some(Ok(location)) => {
                tracing::info!("Staged {} as {}/{}", original_file_name, location.bucket, location.path)
            }
            Some(Err(e)) => tracing::warn!("Staging {} failed: {}", original_file_name, e),
            None => {}
        }

        let local_path = if options.persist {
            Some(temp_path)
        } else {
            if let Err(e) = fs::remove_file(&temp_path) {
                tracing::warn!("Failed to remove {}: {}", temp_path.display(), e);
            }
            None
        };

        Ok(MaterializedArtifact {
            tier,
            extension: ARTIFACT_EXTENSION,
            mime_type: ARTIFACT_MIME_TYPE,
            size_bytes,
            original_file_name: original_file_name.to_string(),
            storage_file_name,
            local_path,
            upload,
        })
    }
}
