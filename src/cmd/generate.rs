//! Generate command CLI handler.

use doc_factory::artifact::{
    ArtifactCache, LocalObjectStore, MaterializeOptions, ObjectStore, SizeTier,
};
use doc_factory::config::FactoryConfig;
use doc_factory::pool::ReferencePool;
use doc_factory::provider::{FakerProvider, Locale};
use doc_factory::record::{ComposeOptions, DocumentFactory, DocumentRecord};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct GenerateArgs {
    pub pool: Option<PathBuf>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub locale: Option<String>,
    pub project: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub attach: Option<String>,
    pub stage: bool,
    pub persist: bool,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown format: {}. Use json or yaml", s)),
        }
    }
}

/// Which tier each attached file uses
#[derive(Debug, Clone, Copy)]
enum AttachMode {
    Fixed(SizeTier),
    Random,
}

impl std::str::FromStr for AttachMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("random") {
            return Ok(AttachMode::Random);
        }
        s.parse().map(AttachMode::Fixed)
    }
}

pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => FactoryConfig::load(path)?,
        None => FactoryConfig::default(),
    };

    let format: OutputFormat = args.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let locale = match args.locale.as_deref() {
        Some(l) => l.parse::<Locale>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.locale.unwrap_or_default(),
    };

    let pool_path = args
        .pool
        .clone()
        .or(config.pool.clone())
        .ok_or_else(|| anyhow::anyhow!("Must specify a reference pool with --pool or in --config"))?;
    let pool = ReferencePool::load(&pool_path)?;

    let count = args.count.or(config.count).unwrap_or(1);
    let project_short_name = args.project.clone().or(config.project_short_name.clone());
    let reference_time = config.reference_time;

    let mut factory = match args.seed.or(config.seed) {
        Some(seed) => DocumentFactory::seeded(seed, locale),
        None => DocumentFactory::new(FakerProvider::new(locale)),
    };
    let project_id = factory.fresh_identifier();

    let mut records = factory.compose_many(count, |_| {
        let mut options = ComposeOptions::with_pool(&pool).project_id(project_id);
        if let Some(name) = &project_short_name {
            options = options.project_short_name(name.clone());
        }
        if let Some(at) = reference_time {
            options = options.reference_time(at);
        }
        options
    })?;

    if let Some(attach) = &args.attach {
        let mode: AttachMode = attach.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let options = MaterializeOptions {
            stage: args.stage || config.artifacts.stage,
            persist: args.persist || config.artifacts.persist,
        };
        attach_files(&mut factory, &mut records, mode, options, &config).await?;
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            write_records(file, &records, format)?;
            eprintln!(
                "Generated {} records from {} reference entries to {}",
                records.len(),
                pool.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            write_records(stdout.lock(), &records, format)?;
        }
    }

    Ok(())
}

async fn attach_files(
    factory: &mut DocumentFactory,
    records: &mut [DocumentRecord],
    mode: AttachMode,
    options: MaterializeOptions,
    config: &FactoryConfig,
) -> anyhow::Result<()> {
    let cache = ArtifactCache::with_dirs(
        config
            .artifacts
            .cache_dir
            .clone()
            .unwrap_or_else(ArtifactCache::default_cache_dir),
        config
            .artifacts
            .temp_root
            .clone()
            .unwrap_or_else(ArtifactCache::default_temp_root),
    )?;
    let store = config
        .artifacts
        .storage_root
        .clone()
        .map(LocalObjectStore::new);
    if options.stage && store.is_none() {
        anyhow::bail!("--stage needs artifacts.storage_root in the config file");
    }

    let mut failed = 0;
    for record in records.iter_mut() {
        let tier = match mode {
            AttachMode::Fixed(tier) => tier,
            AttachMode::Random => SizeTier::random(factory.provider_mut()),
        };
        let file_name = pdf_file_name(&record.original_file_name);
        let artifact = cache
            .materialize_for_document(
                tier,
                &record.project,
                &file_name,
                options,
                store.as_ref().map(|s| s as &dyn ObjectStore),
                factory.provider_mut(),
            )
            .await?;
        if artifact.upload_failed() {
            failed += 1;
        }
        record.attach(&artifact);
    }

    if failed > 0 {
        eprintln!("Warning: {} of {} uploads failed", failed, records.len());
    }
    Ok(())
}

fn pdf_file_name(original: &str) -> String {
    Path::new(original)
        .with_extension("pdf")
        .to_string_lossy()
        .into_owned()
}

fn write_records<W: Write>(
    mut out: W,
    records: &[DocumentRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml_ng::to_writer(&mut out, records)?,
    }
    out.flush()?;
    Ok(())
}
