// Manages the local list of created bids.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Bid struct or its nested types (BidSection, ScopeItem, ...)
// that are not backward compatible through serde defaults require
// incrementing LOCAL_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::Bid;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v0: bare JSON array of bids (no envelope)
// - v1: `{ version, bids }` envelope
const LOCAL_STORAGE_VERSION: u32 = 1;

/// Wrapper struct for versioned local storage
#[derive(Serialize, Deserialize)]
struct LocalStorageData {
    #[serde(default)]
    version: u32,
    bids: Vec<Bid>,
}

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Run `f` while holding an exclusive advisory lock on `file_path`.
    /// Not re-entrant: do not call it again from inside `f` for the same file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Decode the file contents, accepting the legacy bare-array layout.
    /// Returns the bids and whether the file needs rewriting.
    fn decode(json: &str, path: &Path) -> Result<(Vec<Bid>, bool)> {
        if json.trim().is_empty() {
            return Ok((Vec::new(), false));
        }

        if let Ok(data) = serde_json::from_str::<LocalStorageData>(json) {
            if data.version > LOCAL_STORAGE_VERSION {
                return Err(anyhow::anyhow!(
                    "Bid list '{}' has version {} which is newer than supported version {}",
                    path.display(),
                    data.version,
                    LOCAL_STORAGE_VERSION
                ));
            }
            return Ok((data.bids, data.version != LOCAL_STORAGE_VERSION));
        }

        let bids: Vec<Bid> = serde_json::from_str(json)
            .with_context(|| format!("Failed to parse bid list '{}'", path.display()))?;
        log::info!(
            "Migrating {} from v0 to v{}",
            path.display(),
            LOCAL_STORAGE_VERSION
        );
        Ok((bids, true))
    }

    fn read_unlocked(path: &Path) -> Result<(Vec<Bid>, bool)> {
        if !path.exists() {
            return Ok((Vec::new(), false));
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bid list '{}'", path.display()))?;
        Self::decode(&json, path)
    }

    fn write_unlocked(path: &Path, bids: &[Bid]) -> Result<()> {
        let data = LocalStorageData {
            version: LOCAL_STORAGE_VERSION,
            bids: bids.to_vec(),
        };
        let json = serde_json::to_string_pretty(&data)?;
        Self::atomic_write(path, json)
    }

    /// Read-modify-write under one lock. A file that cannot be decoded is an
    /// error and is left untouched, so a bad read never turns into data loss.
    fn modify<F, T>(ctx: &dyn AppContext, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Bid>) -> (T, bool),
    {
        let path = ctx.get_bid_list_path()?;
        Self::with_lock(&path, || {
            let (mut bids, needs_upgrade) = Self::read_unlocked(&path)?;
            let (result, changed) = f(&mut bids);
            if changed || needs_upgrade {
                Self::write_unlocked(&path, &bids)?;
            }
            Ok(result)
        })
    }

    /// Load all saved bids, oldest first.
    pub fn load(ctx: &dyn AppContext) -> Result<Vec<Bid>> {
        let path = ctx.get_bid_list_path()?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        Self::with_lock(&path, || {
            let (bids, needs_upgrade) = Self::read_unlocked(&path)?;
            if needs_upgrade {
                Self::write_unlocked(&path, &bids)?;
            }
            Ok(bids)
        })
    }

    /// Append a bid to the list.
    pub fn save_bid(ctx: &dyn AppContext, bid: &Bid) -> Result<()> {
        Self::modify(ctx, |bids| {
            bids.push(bid.clone());
            ((), true)
        })?;
        log::info!("Saved bid {} for {}", bid.id, bid.client.name);
        Ok(())
    }

    pub fn get_bid(ctx: &dyn AppContext, id: &str) -> Result<Option<Bid>> {
        Ok(Self::load(ctx)?.into_iter().find(|b| b.id == id))
    }

    /// Replace the stored bid with the same id. Returns `false` when no such
    /// bid exists; nothing is written in that case.
    pub fn update_bid(ctx: &dyn AppContext, bid: &Bid) -> Result<bool> {
        Self::modify(ctx, |bids| match bids.iter_mut().find(|b| b.id == bid.id) {
            Some(existing) => {
                *existing = bid.clone();
                (true, true)
            }
            None => (false, false),
        })
    }

    pub fn delete_bid(ctx: &dyn AppContext, id: &str) -> Result<bool> {
        let deleted = Self::modify(ctx, |bids| {
            let before = bids.len();
            bids.retain(|b| b.id != id);
            let deleted = bids.len() != before;
            (deleted, deleted)
        })?;
        if deleted {
            log::info!("Deleted bid {}", id);
        }
        Ok(deleted)
    }

    /// Bids whose id starts with `prefix`, so the CLI can accept short ids.
    pub fn find_by_prefix(ctx: &dyn AppContext, prefix: &str) -> Result<Vec<Bid>> {
        Ok(Self::load(ctx)?
            .into_iter()
            .filter(|b| b.id.starts_with(prefix))
            .collect())
    }
}
