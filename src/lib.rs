//! Fake document records and cached test artifacts for exercising a
//! document-management system.
//!
//! ```no_run
//! use doc_factory::{ComposeOptions, DocumentFactory, Locale, ReferencePool};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = ReferencePool::load(std::path::Path::new("lists.yaml"))?;
//! let mut factory = DocumentFactory::seeded(42, Locale::En);
//! let record = factory.compose(ComposeOptions::with_pool(&pool).project_short_name("site-c"))?;
//! println!("{}", record.internal_url);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod identity;
pub mod locality;
pub mod person;
pub mod pool;
pub mod provider;
pub mod record;

pub use artifact::{ArtifactCache, MaterializeOptions, MaterializedArtifact, SizeTier};
pub use error::{FactoryError, UploadError};
pub use identity::{IdentityGenerator, ObjectId, SequenceCounter};
pub use pool::{ReferenceEntry, ReferenceKind, ReferencePool};
pub use provider::{FakerProvider, Locale, ValueProvider};
pub use record::{ComposeOptions, DocumentFactory, DocumentRecord};
