// File: ./src/context.rs
//! Where bidscope keeps its files.
//!
//! Everything that reads or writes disk takes a `&dyn AppContext`. The
//! binary uses [`StandardContext`] (the platform config/data directories, or
//! `<root>/config` and `<root>/data` under `--root`); tests use
//! [`TestContext`], a throwaway directory per test.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    /// The saved bid list.
    fn get_bid_list_path(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("bids.json"))
    }

    /// Used when the config does not set `archive_root`.
    fn get_default_archive_dir(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join("archive"))
    }
}

#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    /// `<root>/<sub>` under `--root`, else the platform directory picked by
    /// `platform`. Created on first use.
    fn resolve(&self, sub: &str, platform: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
        let dir = match &self.override_root {
            Some(root) => root.join(sub),
            None => {
                let dirs = ProjectDirs::from("com", "bidscope", "bidscope")
                    .ok_or_else(|| anyhow::anyhow!("Cannot locate a home directory"))?;
                platform(&dirs).to_path_buf()
            }
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {:?}", dir))?;
        }
        Ok(dir)
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.resolve("data", ProjectDirs::data_dir)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.resolve("config", ProjectDirs::config_dir)
    }
}

/// A temp directory of its own, deleted when the context is dropped.
#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("bidscope_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }

    fn subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.subdir("data")
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.subdir("config")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
