//! YAML configuration for the fixture builder.
//!
//! Every field is optional; command-line flags take precedence.

use crate::provider::Locale;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactoryConfig {
    /// Seed for reproducible output (random when unset)
    pub seed: Option<u64>,
    pub locale: Option<Locale>,
    pub project_short_name: Option<String>,
    /// Records to generate
    pub count: Option<usize>,
    /// Anchor for generated dates (defaults to now)
    pub reference_time: Option<DateTime<Utc>>,
    /// Reference pool file (YAML or JSON)
    pub pool: Option<PathBuf>,
    pub artifacts: ArtifactConfig,
}

/// Artifact cache and staging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    pub cache_dir: Option<PathBuf>,
    pub temp_root: Option<PathBuf>,
    /// Root of the local object store used for staging
    pub storage_root: Option<PathBuf>,
    pub stage: bool,
    pub persist: bool,
}

impl FactoryConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: FactoryConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.resolve_relative_paths(path.parent().unwrap_or(Path::new(".")));
        Ok(config)
    }

    /// Interpret relative paths against the config file's directory
    fn resolve_relative_paths(&mut self, base: &Path) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        resolve(&mut self.pool);
        resolve(&mut self.artifacts.cache_dir);
        resolve(&mut self.artifacts.temp_root);
        resolve(&mut self.artifacts.storage_root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
seed: 42
locale: fr_fr
project_short_name: site-c
count: 10
reference_time: 2024-06-01T00:00:00Z
pool: /data/lists.yaml
artifacts:
  cache_dir: /var/cache/docs
  stage: true
"#;
        let config: FactoryConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.locale, Some(Locale::FrFr));
        assert_eq!(config.count, Some(10));
        assert!(config.artifacts.stage);
        assert!(!config.artifacts.persist);
        assert_eq!(
            config.reference_time.unwrap().to_rfc3339(),
            "2024-06-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parsed: Result<FactoryConfig, _> = serde_yaml_ng::from_str("sede: 1\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pool: lists.yaml\nartifacts:\n  cache_dir: cache").unwrap();
        file.flush().unwrap();

        let config = FactoryConfig::load(file.path()).unwrap();
        let base = file.path().parent().unwrap();
        assert_eq!(config.pool.unwrap(), base.join("lists.yaml"));
        assert_eq!(config.artifacts.cache_dir.unwrap(), base.join("cache"));
    }
}
