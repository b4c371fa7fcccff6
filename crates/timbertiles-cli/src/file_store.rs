use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use timbertiles_game::KeyValueStore;

/// A [`KeyValueStore`] kept in memory and mirrored to a JSON object on disk
/// after every change.
#[derive(Debug, Clone)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Loads the store at `path`. A missing or unreadable file yields an empty
    /// store; the file is only written on the first change.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("ignoring unreadable profile {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no profile at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("cannot read profile {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }

    fn flush(&self) {
        if let Err(e) = self.save() {
            warn!("cannot write profile {}: {e}", self.path.display());
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::process;

    use timbertiles_game::Profile;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("timbertiles-{}-{name}.json", process::id()))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let mut store = JsonFileStore::open(&path);
        store.set("timbertiles_coins", "12".to_owned());
        store.set("other", "x".to_owned());
        store.remove("other");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("timbertiles_coins").as_deref(), Some("12"));
        assert_eq!(store.keys(), vec!["timbertiles_coins".to_owned()]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonFileStore::open(temp_path("missing"));
        assert!(store.keys().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();

        let mut profile = Profile::new(JsonFileStore::open(&path));
        assert_eq!(profile.coins(), 0);
        profile.add_coins(3);

        let profile = Profile::new(JsonFileStore::open(&path));
        assert_eq!(profile.coins(), 3);
        fs::remove_file(&path).unwrap();
    }
}
