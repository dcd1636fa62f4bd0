use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn sift_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".sift"))
}

pub fn ensure_sift_home() -> Result<PathBuf> {
    let dir = sift_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(sift_home()?.join("config.toml"))
}
