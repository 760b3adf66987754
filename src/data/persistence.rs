use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_norway::with::singleton_map_recursive;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load/save operations.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    // Fallback when running tests or if set_data_dir was not called
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

/// Serialization format picked from a file extension: `.json` is JSON,
/// anything else is YAML.
pub fn is_json_path(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Reads and parses `path` as JSON or YAML.
pub fn read_file<T: DeserializeOwned>(path: &Path, json: bool) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if json {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON from {}", path.display()))
    } else {
        from_yaml_str(&contents)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }
}

/// Parses YAML where enum variants are written as single-key maps
/// (`- toggle: weekdays`) rather than YAML tags (`- !toggle weekdays`).
pub fn from_yaml_str<T: DeserializeOwned>(contents: &str) -> Result<T> {
    let de = serde_norway::Deserializer::from_str(contents);
    Ok(singleton_map_recursive::deserialize(de)?)
}

/// Serializes `value` to `path`, creating the parent directory when needed.
pub fn write_file<T: Serialize>(value: &T, path: &Path, json: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }
    let contents = if json {
        serde_json::to_string_pretty(value).context("failed to serialize JSON")?
    } else {
        serde_norway::to_string(value).context("failed to serialize YAML")?
    };
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// A file-backed value in the data directory. Only configuration goes
/// through here; wizard answers are never written to disk.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;

    fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    /// Load from an explicit directory, bypassing the global `DATA_DIR`.
    /// A missing file yields the default value.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            return Ok(Self::default());
        }
        read_file(&path, Self::is_json())
    }

    /// Save to an explicit directory, bypassing the global `DATA_DIR`.
    fn save_to(&self, dir: &Path) -> Result<()> {
        write_file(self, &dir.join(Self::filename()), Self::is_json())
    }
}
