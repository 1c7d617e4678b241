//! Activity snapshot cache
//!
//! Keeps the last fetched activity per source on disk so the heatmap still
//! renders when the backend is unreachable. Snapshots are merged, so days
//! that fall out of the fetch window stay in the history.

use crate::types::{ActivityDay, CacheWarning, RadquizError, Result};
use chrono::NaiveDate;
use directories::BaseDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub source: String,
    pub updated_at: i64,
    pub days: Vec<ActivityDay>,
}

pub struct ActivityCacheService {
    cache_dir: PathBuf,
}

impl ActivityCacheService {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| RadquizError::Cache("Cannot determine home directory".into()))?;
        let cache_dir = base_dirs.home_dir().join(".radquiz").join("cache");
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_path(&self, source: &str) -> PathBuf {
        self.cache_dir.join(format!("{}_activity.json", source))
    }

    /// Load cached days, sorted by date. Uses a shared lock for
    /// concurrent read safety. Returns (days, optional_warning).
    pub fn load(&self, source: &str) -> (Vec<ActivityDay>, Option<CacheWarning>) {
        let path = self.cache_path(source);
        if !path.exists() {
            return (Vec::new(), None);
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                return (
                    Vec::new(),
                    Some(CacheWarning::LoadFailed(format!(
                        "Failed to open cache: {}",
                        e
                    ))),
                );
            }
        };

        if let Err(e) = file.lock_shared() {
            return (
                Vec::new(),
                Some(CacheWarning::LoadFailed(format!(
                    "Failed to acquire read lock: {}",
                    e
                ))),
            );
        }

        let mut content = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut content) {
            let _ = file.unlock();
            return (
                Vec::new(),
                Some(CacheWarning::LoadFailed(format!(
                    "Failed to read cache: {}",
                    e
                ))),
            );
        }
        let _ = file.unlock();

        match serde_json::from_str::<ActivitySnapshot>(&content) {
            Ok(snapshot) => {
                let mut days = snapshot.days;
                days.sort_by_key(|d| d.date);
                (days, None)
            }
            Err(e) => (
                Vec::new(),
                Some(CacheWarning::Corrupted(format!(
                    "Corrupted cache file: {}",
                    e
                ))),
            ),
        }
    }

    /// Merge `days` into the cached history (fresh counts win) and save.
    pub fn save(&self, source: &str, days: &[ActivityDay]) -> Result<()> {
        let (cached, _) = self.load(source);

        let mut merged: BTreeMap<NaiveDate, u32> =
            cached.iter().map(|d| (d.date, d.solved_count)).collect();
        for day in days {
            merged.insert(day.date, day.solved_count);
        }

        let days: Vec<ActivityDay> = merged
            .into_iter()
            .map(|(date, solved_count)| ActivityDay::new(date, solved_count))
            .collect();

        self.write_snapshot(source, days)
    }

    pub fn clear(&self, source: &str) -> Result<()> {
        let path = self.cache_path(source);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Save using atomic write (temp file + rename) with exclusive lock.
    fn write_snapshot(&self, source: &str, days: Vec<ActivityDay>) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let snapshot = ActivitySnapshot {
            source: source.to_string(),
            updated_at: chrono::Utc::now().timestamp(),
            days,
        };

        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| RadquizError::Cache(format!("Serialization failed: {}", e)))?;

        let path = self.cache_path(source);
        let temp_path = path.with_extension("json.tmp");

        {
            let mut file = File::create(&temp_path)
                .map_err(|e| RadquizError::Cache(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| RadquizError::Cache(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| RadquizError::Cache(format!("Failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        target
            .lock_exclusive()
            .map_err(|e| RadquizError::Cache(format!("Failed to acquire write lock: {}", e)))?;

        fs::rename(&temp_path, &path)
            .map_err(|e| RadquizError::Cache(format!("Failed to rename temp file: {}", e)))?;

        let _ = target.unlock();
        Ok(())
    }
}
