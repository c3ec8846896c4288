use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CACHE_DIR: &str = "fdr_terminal";
const CACHE_FILE: &str = "entry.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryFile {
    version: u32,
    entry_id: u32,
}

pub fn resolve_entry_id(explicit: Option<u32>, cached: Option<u32>) -> Option<u32> {
    explicit.or(cached)
}

pub fn load_entry_id() -> Option<u32> {
    load_entry_id_from(&entry_path()?)
}

pub fn save_entry_id(entry_id: u32) -> Result<()> {
    let Some(path) = entry_path() else {
        return Ok(());
    };
    save_entry_id_to(&path, entry_id)
}

/// Unreadable, stale or malformed files count as "nothing remembered".
pub fn load_entry_id_from(path: &Path) -> Option<u32> {
    let raw = fs::read_to_string(path).ok()?;
    let file = serde_json::from_str::<EntryFile>(&raw).ok()?;
    if file.version != CACHE_VERSION || file.entry_id == 0 {
        return None;
    }
    Some(file.entry_id)
}

pub fn save_entry_id_to(path: &Path, entry_id: u32) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create entry cache dir")?;
    }
    let file = EntryFile {
        version: CACHE_VERSION,
        entry_id,
    };
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(&file).context("serialize entry id")?;
    fs::write(&tmp, json).context("write entry id")?;
    fs::rename(&tmp, path).context("swap entry id")?;
    Ok(())
}

pub fn share_hint(entry_id: u32) -> String {
    format!("fdr_terminal --entry {entry_id}")
}

fn entry_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fdr_terminal_test_{}_{name}", std::process::id()))
            .join(CACHE_FILE)
    }

    #[test]
    fn explicit_beats_cached() {
        assert_eq!(resolve_entry_id(Some(1), Some(2)), Some(1));
        assert_eq!(resolve_entry_id(None, Some(2)), Some(2));
        assert_eq!(resolve_entry_id(None, None), None);
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        save_entry_id_to(&path, 4321).expect("save should succeed");
        assert_eq!(load_entry_id_from(&path), Some(4321));
        save_entry_id_to(&path, 99).expect("overwrite should succeed");
        assert_eq!(load_entry_id_from(&path), Some(99));
        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn garbage_file_is_unset() {
        let path = temp_path("garbage");
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        fs::write(&path, "not json").expect("write");
        assert_eq!(load_entry_id_from(&path), None);
        fs::write(&path, r#"{"version":0,"entry_id":5}"#).expect("write");
        assert_eq!(load_entry_id_from(&path), None);
        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
        assert_eq!(load_entry_id_from(&path), None);
    }

    #[test]
    fn unwritable_cache_dir_reports_cause() {
        let path = temp_path("blocked");
        let dir = path.parent().expect("has parent");
        let _ = fs::remove_dir_all(dir);
        fs::write(dir, "file in the way").expect("write blocker");
        let err = save_entry_id_to(&path, 7).expect_err("dir is a file");
        assert!(format!("{err:#}").contains("create entry cache dir"));
        let _ = fs::remove_file(dir);
    }
}
