use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use sift_core::{LedgerSchema, SourceCatalog};
use sift_ingest::ImportOptions;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_config_path, ensure_sift_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourceCatalog,
    pub import: ImportOptions,
    pub ledger: LedgerSchema,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.sources.validate()?;
        self.import.validate()?;
        Ok(())
    }
}

/// Resolve the config path: an explicit `--config` wins over ~/.sift/config.toml.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load and validate the configuration. A missing default file means
/// built-in defaults; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = config_path(explicit)?;
    if !p.exists() {
        if explicit.is_some() {
            bail!("config file not found: {}", p.display());
        }
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => ensure_sift_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_ingest::ColumnStrategy;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[import]\ndate_marker = \"תאריך\"\ncolumn_strategy = \"header_labels\"\n\n[ledger]\ncategory_column = \"פירוט נוסף\"\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.import.date_marker, "תאריך");
        assert_eq!(cfg.import.column_strategy, ColumnStrategy::HeaderLabels);
        assert!(!cfg.import.date_formats.is_empty());
        assert_eq!(cfg.ledger.category_column, "פירוט נוסף");
        assert_eq!(cfg.ledger.counterparty_column, "business name");
        assert_eq!(cfg.sources.labels.len(), 5);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_invalid_sources_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[sources]\nlabels = []\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# mine\n").unwrap();
        init_config(Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
