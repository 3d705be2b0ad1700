//! Artifacts command CLI handler.

use doc_factory::artifact::{ArtifactCache, SizeTier};
use std::path::PathBuf;

pub fn run(tier: Option<String>, cache_dir: Option<PathBuf>, rebuild: bool) -> anyhow::Result<()> {
    let tiers: Vec<SizeTier> = match tier {
        Some(t) => vec![t.parse().map_err(|e: String| anyhow::anyhow!(e))?],
        None => SizeTier::ALL.to_vec(),
    };

    let cache = ArtifactCache::with_dirs(
        cache_dir.unwrap_or_else(ArtifactCache::default_cache_dir),
        ArtifactCache::default_temp_root(),
    )?;

    if rebuild {
        let removed = cache.clear()?;
        if removed > 0 {
            eprintln!("Removed {} cached artifacts", removed);
        }
    }

    println!("{:<8} {:>6} {:>12}  PATH", "TIER", "PAGES", "BYTES");
    for tier in tiers {
        let path = cache.ensure_cached_artifact(tier)?;
        let bytes = cache.cached_size(tier).unwrap_or(0);
        println!(
            "{:<8} {:>6} {:>12}  {}",
            tier,
            tier.pages(),
            bytes,
            path.display()
        );
    }

    Ok(())
}
