//! Lazily loaded `/proc/meminfo` table.

use crate::error::{Result, TelemetryError};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Memory information keyed by normalized field name.
///
/// The file is read on first lookup and the parsed table is kept for the
/// lifetime of the value. A failed read is not cached, so a later lookup
/// retries. Keys are stripped of everything but ASCII letters and digits:
/// `Active(anon):` becomes `Activeanon`.
#[derive(Debug)]
pub struct MemInfo {
    path: PathBuf,
    table: OnceCell<HashMap<String, u64>>,
}

impl MemInfo {
    /// Create an unloaded table backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    /// Look up `key`, returning `default` when it is missing or the file is unreadable.
    pub fn get(&self, key: &str, default: u64) -> u64 {
        self.table()
            .and_then(|table| table.get(key).copied())
            .unwrap_or(default)
    }

    /// Whether the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Number of parsed entries, zero if the file cannot be read.
    pub fn len(&self) -> usize {
        self.table().map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> Option<&HashMap<String, u64>> {
        if let Some(table) = self.table.get() {
            return Some(table);
        }
        match read_meminfo(&self.path) {
            Ok(table) => Some(self.table.get_or_init(|| table)),
            Err(err) => {
                debug!("meminfo unavailable at {}: {}", self.path.display(), err);
                None
            }
        }
    }
}

fn read_meminfo(path: &Path) -> Result<HashMap<String, u64>> {
    let contents = fs::read_to_string(path)?;
    let table = parse_meminfo(&contents);
    if table.is_empty() {
        return Err(TelemetryError::parse_error(format!(
            "no entries in {}",
            path.display()
        )));
    }
    Ok(table)
}

/// Parse `name value [unit]` lines, skipping any that do not fit.
pub fn parse_meminfo(contents: &str) -> HashMap<String, u64> {
    let mut table = HashMap::new();
    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            continue;
        };
        let key = normalize_key(name);
        if !key.is_empty() {
            table.insert(key, value);
        }
    }
    table
}

fn normalize_key(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}
