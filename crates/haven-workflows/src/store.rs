//! Flat JSON file persistence.

use std::collections::HashMap;
use std::path::Path;

use haven_core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads a keyed record map from a JSON file.
///
/// A missing file yields an empty map; a corrupt file is treated the same
/// way, with a warning, so a bad deploy never wedges the system.
pub fn load_map<T: DeserializeOwned>(path: &Path) -> HashMap<String, T> {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Unreadable store, starting empty");
                HashMap::new()
            }
        },
        Err(_) => HashMap::new(),
    }
}

/// Rewrites the whole record map to the JSON file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_map<T: Serialize>(path: &Path, map: &HashMap<String, T>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let raw = serde_json::to_string_pretty(map)?;
    std::fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map: HashMap<String, Record> = load_map(&dir.path().join("absent.json"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut map = HashMap::new();
        map.insert(
            "r1".to_string(),
            Record {
                name: "one".to_string(),
                count: 3,
            },
        );
        save_map(&path, &map).unwrap();

        let loaded: HashMap<String, Record> = load_map(&path);
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let map: HashMap<String, Record> = load_map(&path);
        assert!(map.is_empty());
    }
}
