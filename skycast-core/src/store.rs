//! Durable client storage: two independent JSON files in the platform data
//! directory, one for the theme preference and one for the saved places.
//!
//! Reads tolerate absent or corrupt content by falling back to defaults;
//! writes happen on every change.

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::model::{SavedPlace, Theme};
use crate::{Error, Result};

const THEME_FILE: &str = "theme.json";
const PLACES_FILE: &str = "saved_places.json";

/// File-backed preference store.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    dir: PathBuf,
}

impl PrefsStore {
    /// Open the store in the platform data directory, creating it if needed.
    pub fn open() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| Error::Config("Could not determine platform data directory".into()))?;
        Ok(Self::at(dirs.data_dir().to_path_buf()))
    }

    /// Open the store at an explicit directory. Used by tests.
    #[must_use]
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Theme preference, defaulting on absent or corrupt content.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        self.read_or_default(THEME_FILE)
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.write(THEME_FILE, &theme)
    }

    /// Saved places, defaulting to an empty list on absent or corrupt content.
    #[must_use]
    pub fn load_saved_places(&self) -> Vec<SavedPlace> {
        self.read_or_default(PLACES_FILE)
    }

    pub fn save_places(&self, places: &[SavedPlace]) -> Result<()> {
        self.write(PLACES_FILE, &places)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return T::default(),
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring corrupt preference file");
                T::default()
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| Error::Config(format!("Failed to serialize {file}: {e}")))?;
        fs::write(self.dir.join(file), json)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// Convenience for tests and callers that already have a directory.
impl From<&Path> for PrefsStore {
    fn from(dir: &Path) -> Self {
        Self::at(dir.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlaceCandidate;

    fn place(name: &str, lat: f64, lon: f64) -> SavedPlace {
        PlaceCandidate {
            name: name.into(),
            lat,
            lon,
            country: "NG".into(),
            state: None,
        }
    }

    #[test]
    fn theme_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().to_path_buf());

        assert_eq!(store.load_theme(), Theme::Light);

        store.save_theme(Theme::Dark).unwrap();
        assert_eq!(store.load_theme(), Theme::Dark);
    }

    #[test]
    fn saved_places_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().to_path_buf());

        let places = vec![place("Abuja", 9.07, 7.49), place("Lagos", 6.45, 3.39)];
        store.save_places(&places).unwrap();

        assert_eq!(store.load_saved_places(), places);
    }

    #[test]
    fn absent_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().join("never-written"));

        assert_eq!(store.load_theme(), Theme::Light);
        assert!(store.load_saved_places().is_empty());
    }

    #[test]
    fn corrupt_files_fall_back_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().to_path_buf());

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(store.path(THEME_FILE), "not json at all").unwrap();
        fs::write(store.path(PLACES_FILE), r#"{"oops": true}"#).unwrap();

        assert_eq!(store.load_theme(), Theme::Light);
        assert!(store.load_saved_places().is_empty());
    }
}
