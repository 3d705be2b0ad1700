//! Document record composition.
//!
//! Produces complete, internally consistent document records: every
//! classification reference points into the supplied pool (or is freshly
//! generated when the pool lacks that category), audit dates are ordered by
//! construction, and labels are distinct.

use crate::artifact::MaterializedArtifact;
use crate::error::FactoryError;
use crate::identity::{IdentityGenerator, ObjectId};
use crate::person::{synthesize_person, PersonOverrides, PersonProfile};
use crate::pool::{ReferenceKind, ReferencePool};
use crate::provider::{choose, FakerProvider, Locale, ValueProvider};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Project name used when the caller does not name a project
pub const UNSET_PROJECT_NAME: &str = "the-project-name";

/// Roles shown as able to read a document. Display only; not enforced here.
pub const DEFAULT_READ_ROLES: &[&str] = &[
    "public",
    "project-admin",
    "project-intake",
    "project-team",
    "project-system-admin",
];

pub const DEFAULT_WRITE_ROLES: &[&str] = &[
    "project-admin",
    "project-intake",
    "project-team",
    "project-system-admin",
];

pub const DEFAULT_DELETE_ROLES: &[&str] = &[
    "project-admin",
    "project-intake",
    "project-team",
    "project-system-admin",
];

/// Upper bound on labels per document
pub const MAX_LABELS: u64 = 5;

/// Share of documents that pass the antivirus check
pub const ANTIVIRUS_PASS_RATE: f64 = 0.95;

const POSTED_YEARS_BACK: u32 = 10;
const MAX_UPDATE_LAG_DAYS: u64 = 45;
const MAX_UPLOAD_LAG_DAYS: u64 = 15;
const MAX_CREATE_LAG_DAYS: u64 = 15;

const STORAGE_TOKEN_MIN: u64 = 999_999_999_999;
const STORAGE_TOKEN_MAX: u64 = 10_000_000_000_000;
const STORAGE_SUFFIX_LEN: usize = 60;

// Staff upload some very large docx and pptx files
const SIZE_MIN_BYTES: u64 = 20_000;
const SIZE_MAX_BYTES: u64 = 250_000_000;

const DOCUMENT_SOURCES: &[&str] = &["COMMENT", "DROPZONE", "PROJECT"];
const REVIEW_STATUSES: &[&str] = &["", "Published", "Rejected"];

/// Extension and MIME type of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTypeProfile {
    pub extension: &'static str,
    pub mime_type: &'static str,
}

const fn file_type(extension: &'static str, mime_type: &'static str) -> FileTypeProfile {
    FileTypeProfile {
        extension,
        mime_type,
    }
}

/// File types documents are drawn from
pub const FILE_TYPES: &[FileTypeProfile] = &[
    file_type("jpg", "image/jpeg"),
    file_type("jpeg", "image/jpeg"),
    file_type("gif", "image/gif"),
    file_type("png", "image/png"),
    file_type("bmp", "image/bmp"),
    file_type("doc", "application/msword"),
    file_type(
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    file_type("xls", "application/vnd.ms-excel"),
    file_type(
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    file_type("ppt", "application/vnd.ms-powerpoint"),
    file_type(
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    file_type("pdf", "application/pdf"),
    file_type("txt", "text/plain"),
];

/// A synthesized document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: ObjectId,
    pub project: ObjectId,
    pub comment: ObjectId,

    // Tracking
    pub created_date: DateTime<Utc>,
    pub uploaded_date: DateTime<Utc>,
    pub posted_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    pub added_by: String,
    pub updated_by: Option<String>,
    pub deleted_by: Option<String>,

    pub read: Vec<String>,
    pub write: Vec<String>,
    pub delete: Vec<String>,

    // File
    pub original_file_name: String,
    pub storage_file_name: String,
    pub internal_url: String,
    pub extension: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub antivirus_passed: bool,

    // Meta
    pub display_name: String,
    pub description: String,
    pub document_source: String,
    pub document_author: String,
    pub document_type: ObjectId,
    pub author_type: ObjectId,
    pub project_phase: ObjectId,
    pub milestone: Option<ObjectId>,
    pub status: String,
    pub keywords: String,
    pub labels: Vec<String>,
}

impl DocumentRecord {
    /// Point the file metadata at a materialized artifact
    pub fn attach(&mut self, artifact: &MaterializedArtifact) {
        self.extension = artifact.extension.to_string();
        self.mime_type = artifact.mime_type.to_string();
        self.size_bytes = artifact.size_bytes;
        self.original_file_name = artifact.original_file_name.clone();
        self.storage_file_name = artifact.storage_file_name.clone();
        self.display_name = artifact.original_file_name.clone();
        self.antivirus_passed = true;
        self.internal_url = artifact.internal_url();
    }
}

/// Where the composer's reference pool came from
#[derive(Debug, Clone, Copy)]
pub enum PoolSource<'a> {
    /// The `lists` of a pipeline being built alongside the documents
    Pipeline(&'a ReferencePool),
    /// A pool supplied on its own
    ListsPool(&'a ReferencePool),
}

impl<'a> PoolSource<'a> {
    /// Pick a source, preferring the pipeline when both are given
    pub fn resolve(
        pipeline: Option<&'a ReferencePool>,
        lists_pool: Option<&'a ReferencePool>,
    ) -> Option<Self> {
        pipeline
            .map(PoolSource::Pipeline)
            .or_else(|| lists_pool.map(PoolSource::ListsPool))
    }

    pub fn pool(&self) -> &'a ReferencePool {
        match *self {
            PoolSource::Pipeline(pool) | PoolSource::ListsPool(pool) => pool,
        }
    }
}

/// Per-record options
#[derive(Debug, Default)]
pub struct ComposeOptions<'a> {
    pub project_short_name: Option<String>,
    pub project_id: Option<ObjectId>,
    pub pool_source: Option<PoolSource<'a>>,
    /// Replaces the factory's provider for this record only
    pub provider: Option<&'a mut dyn ValueProvider>,
    /// Anchor for the posted date; defaults to now
    pub reference_time: Option<DateTime<Utc>>,
}

impl<'a> ComposeOptions<'a> {
    pub fn with_pool(pool: &'a ReferencePool) -> Self {
        Self {
            pool_source: Some(PoolSource::ListsPool(pool)),
            ..Default::default()
        }
    }

    pub fn with_pipeline(pool: &'a ReferencePool) -> Self {
        Self {
            pool_source: Some(PoolSource::Pipeline(pool)),
            ..Default::default()
        }
    }

    pub fn project_short_name(mut self, name: impl Into<String>) -> Self {
        self.project_short_name = Some(name.into());
        self
    }

    pub fn project_id(mut self, id: ObjectId) -> Self {
        self.project_id = Some(id);
        self
    }

    pub fn provider(mut self, provider: &'a mut dyn ValueProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn reference_time(mut self, at: DateTime<Utc>) -> Self {
        self.reference_time = Some(at);
        self
    }
}

/// Composes document records
#[derive(Debug)]
pub struct DocumentFactory {
    provider: Box<dyn ValueProvider>,
    identity: IdentityGenerator,
    display_sequence: u64,
}

impl DocumentFactory {
    pub fn new(provider: impl ValueProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            identity: IdentityGenerator::new(),
            display_sequence: 0,
        }
    }

    /// Factory whose records are reproducible for a given seed and pool
    pub fn seeded(seed: u64, locale: Locale) -> Self {
        Self::new(FakerProvider::seeded(seed, locale))
    }

    pub fn with_identity(mut self, identity: IdentityGenerator) -> Self {
        self.identity = identity;
        self
    }

    pub fn identity(&self) -> &IdentityGenerator {
        &self.identity
    }

    /// The factory's own provider, for draws outside record composition
    pub fn provider_mut(&mut self) -> &mut dyn ValueProvider {
        self.provider.as_mut()
    }

    /// A fresh identifier drawn from the factory's provider
    pub fn fresh_identifier(&mut self) -> ObjectId {
        self.identity.fresh_identifier(self.provider.as_mut())
    }

    /// Compose one record.
    ///
    /// Fails only when `options` carries no reference pool.
    pub fn compose(&mut self, options: ComposeOptions<'_>) -> Result<DocumentRecord, FactoryError> {
        let ComposeOptions {
            project_short_name,
            project_id,
            pool_source,
            provider,
            reference_time,
        } = options;

        let pool = pool_source
            .ok_or(FactoryError::MissingReferencePool)?
            .pool();

        let project_short_name = project_short_name
            .filter(|name| !name.is_empty() && name != UNSET_PROJECT_NAME)
            .unwrap_or_else(|| UNSET_PROJECT_NAME.to_string());

        self.display_sequence += 1;
        let display_name = format!("Test Document {}", self.display_sequence);

        let provider: &mut dyn ValueProvider = match provider {
            Some(p) => p,
            None => self.provider.as_mut(),
        };

        let record = build_record(RecordInputs {
            provider,
            identity: &self.identity,
            pool,
            project_short_name,
            project_id,
            display_name,
            reference_time: reference_time.unwrap_or_else(Utc::now),
        });
        tracing::debug!(
            "Composed {} ({}, {} labels)",
            record.id,
            record.extension,
            record.labels.len()
        );
        Ok(record)
    }

    /// Compose `count` records, asking `options` for each one's options
    pub fn compose_many<'a, F>(
        &mut self,
        count: usize,
        mut options: F,
    ) -> Result<Vec<DocumentRecord>, FactoryError>
    where
        F: FnMut(usize) -> ComposeOptions<'a>,
    {
        (0..count).map(|i| self.compose(options(i))).collect()
    }
}

impl Default for DocumentFactory {
    fn default() -> Self {
        Self::new(FakerProvider::default())
    }
}

struct RecordInputs<'a> {
    provider: &'a mut dyn ValueProvider,
    identity: &'a IdentityGenerator,
    pool: &'a ReferencePool,
    project_short_name: String,
    project_id: Option<ObjectId>,
    display_name: String,
    reference_time: DateTime<Utc>,
}

fn build_record(inputs: RecordInputs<'_>) -> DocumentRecord {
    let RecordInputs {
        provider,
        identity,
        pool,
        project_short_name,
        project_id,
        display_name,
        reference_time,
    } = inputs;

    let author = synthesize_person(provider, &PersonOverrides::default());
    let updator = pick_updator(provider, &author);
    let deletor = pick_deletor(provider, &author, updator.as_ref());

    let timeline = Timeline::draw(provider, reference_time, updator.is_some());

    let file_type = *choose(provider, FILE_TYPES).unwrap_or(&FILE_TYPES[0]);
    let storage_file_name = storage_file_name(provider, file_type.extension);
    let labels = sample_distinct_labels(pool, provider);

    let id = identity.fresh_identifier(provider);
    let project = project_id.unwrap_or_else(|| identity.fresh_identifier(provider));
    let comment = identity.fresh_identifier(provider);

    DocumentRecord {
        id,
        project,
        comment,

        created_date: timeline.created,
        uploaded_date: timeline.uploaded,
        posted_date: timeline.posted,
        updated_date: timeline.updated,
        added_by: author.qualified_login(),
        updated_by: updator.as_ref().map(PersonProfile::qualified_login),
        deleted_by: deletor.as_ref().map(PersonProfile::qualified_login),

        read: to_strings(DEFAULT_READ_ROLES),
        write: to_strings(DEFAULT_WRITE_ROLES),
        delete: to_strings(DEFAULT_DELETE_ROLES),

        original_file_name: generate_original_file_name(provider, file_type.extension),
        internal_url: format!("etl/{}/{}", project_short_name, storage_file_name),
        storage_file_name,
        extension: file_type.extension.to_string(),
        mime_type: file_type.mime_type.to_string(),
        size_bytes: provider.number(SIZE_MIN_BYTES, SIZE_MAX_BYTES),
        antivirus_passed: provider.chance(ANTIVIRUS_PASS_RATE),

        display_name,
        description: provider.sentence(),
        document_source: pick_str(provider, DOCUMENT_SOURCES),
        document_author: author.full_name.clone(),
        document_type: pool.resolve_id_or_fresh(&ReferenceKind::Doctype, provider, identity),
        author_type: pool.resolve_id_or_fresh(&ReferenceKind::Author, provider, identity),
        project_phase: pool.resolve_id_or_fresh(&ReferenceKind::ProjectPhase, provider, identity),
        milestone: if provider.boolean() {
            Some(identity.fresh_identifier(provider))
        } else {
            None
        },
        status: pick_str(provider, REVIEW_STATUSES),
        keywords: String::new(),
        labels,
    }
}

/// Audit dates, computed backwards from the posted date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timeline {
    posted: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
    uploaded: DateTime<Utc>,
    created: DateTime<Utc>,
}

impl Timeline {
    fn draw(provider: &mut dyn ValueProvider, reference: DateTime<Utc>, updated: bool) -> Self {
        let posted = provider.date_past(POSTED_YEARS_BACK, reference);
        let updated = updated.then(|| posted - days(provider, MAX_UPDATE_LAG_DAYS));
        let uploaded = updated.unwrap_or(posted) - days(provider, MAX_UPLOAD_LAG_DAYS);
        let created = uploaded - days(provider, MAX_CREATE_LAG_DAYS);
        Self {
            posted,
            updated,
            uploaded,
            created,
        }
    }
}

fn days(provider: &mut dyn ValueProvider, max: u64) -> Duration {
    Duration::days(provider.number(0, max) as i64)
}

/// Nobody, the author, or someone new, with equal odds
fn pick_updator(provider: &mut dyn ValueProvider, author: &PersonProfile) -> Option<PersonProfile> {
    match provider.index(3) {
        0 => None,
        1 => Some(author.clone()),
        _ => Some(synthesize_person(provider, &PersonOverrides::default())),
    }
}

/// Like [`pick_updator`], with the updator as a fourth option when there is one
fn pick_deletor(
    provider: &mut dyn ValueProvider,
    author: &PersonProfile,
    updator: Option<&PersonProfile>,
) -> Option<PersonProfile> {
    let options = if updator.is_some() { 4 } else { 3 };
    match provider.index(options) {
        0 => None,
        1 => Some(author.clone()),
        2 => Some(synthesize_person(provider, &PersonOverrides::default())),
        _ => updator.cloned(),
    }
}

/// `<13 digit token>_<60 lowercase alphanumerics>.<ext>`.
///
/// Uniqueness is probabilistic; no collision check is made.
fn storage_file_name(provider: &mut dyn ValueProvider, extension: &str) -> String {
    let token = provider.number(STORAGE_TOKEN_MIN, STORAGE_TOKEN_MAX);
    let suffix = provider.alphanumeric(STORAGE_SUFFIX_LEN).to_lowercase();
    format!("{}_{}.{}", token, suffix, extension)
}

/// Up to [`MAX_LABELS`] distinct label names from the pool
fn sample_distinct_labels(pool: &ReferencePool, provider: &mut dyn ValueProvider) -> Vec<String> {
    let wanted = provider.number(0, MAX_LABELS) as usize;

    let mut candidates: Vec<&str> = Vec::new();
    for entry in pool.of_kind(&ReferenceKind::Label) {
        if !candidates.contains(&entry.name.as_str()) {
            candidates.push(&entry.name);
        }
    }

    let mut labels = Vec::with_capacity(wanted.min(candidates.len()));
    while labels.len() < wanted && !candidates.is_empty() {
        let i = provider.index(candidates.len());
        labels.push(candidates.swap_remove(i).to_string());
    }
    labels
}

/// A sentence, minus its trailing period, used as a file name
pub fn generate_original_file_name(provider: &mut dyn ValueProvider, extension: &str) -> String {
    let sentence = provider.sentence();
    format!("{}.{}", sentence.trim_end_matches('.'), extension)
}

fn pick_str(provider: &mut dyn ValueProvider, items: &[&str]) -> String {
    choose(provider, items).map(|s| s.to_string()).unwrap_or_default()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ReferenceEntry;

    fn label_pool(names: &[&str]) -> ReferencePool {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let id = ObjectId::parse(&format!("{:024x}", i + 1)).unwrap();
                ReferenceEntry::new(ReferenceKind::Label, id, *name)
            })
            .collect()
    }

    #[test]
    fn test_labels_deduplicated_by_name() {
        let pool = label_pool(&["Report", "Report", "Letter", "Report"]);
        let mut p = FakerProvider::seeded(8, Locale::En);
        for _ in 0..50 {
            let labels = sample_distinct_labels(&pool, &mut p);
            assert!(labels.len() <= 2);
            let mut sorted = labels.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), labels.len());
        }
    }

    #[test]
    fn test_timeline_without_update() {
        let mut p = FakerProvider::seeded(3, Locale::En);
        let now = Utc::now();
        let t = Timeline::draw(&mut p, now, false);
        assert!(t.updated.is_none());
        assert!(t.created <= t.uploaded);
        assert!(t.uploaded <= t.posted);
        assert!(t.posted <= now);
    }

    #[test]
    fn test_deletor_choices() {
        let mut p = FakerProvider::seeded(12, Locale::En);
        let author = synthesize_person(&mut p, &PersonOverrides::named("Ada", "Lovelace"));
        let updator = synthesize_person(&mut p, &PersonOverrides::named("Quorra", "Zzyzx"));

        let mut reused_updator = false;
        for _ in 0..200 {
            if pick_deletor(&mut p, &author, Some(&updator)).as_ref() == Some(&updator) {
                reused_updator = true;
            }
            if let Some(deletor) = pick_deletor(&mut p, &author, None) {
                assert_ne!(deletor.last_name, "Zzyzx");
            }
        }
        assert!(reused_updator);
    }

    #[test]
    fn test_storage_file_name_shape() {
        let mut p = FakerProvider::seeded(5, Locale::En);
        let name = storage_file_name(&mut p, "pdf");
        let (token, rest) = name.split_once('_').unwrap();
        let token: u64 = token.parse().unwrap();
        assert!((STORAGE_TOKEN_MIN..=STORAGE_TOKEN_MAX).contains(&token));
        let (suffix, ext) = rest.rsplit_once('.').unwrap();
        assert_eq!(suffix.len(), STORAGE_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(ext, "pdf");
    }

    #[test]
    fn test_original_file_name_has_single_extension() {
        let mut p = FakerProvider::seeded(5, Locale::En);
        let name = generate_original_file_name(&mut p, "docx");
        assert!(name.ends_with(".docx"));
        assert!(!name.contains(".."));
    }
}
