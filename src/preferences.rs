use serde::{Deserialize, Serialize};
use tokio::fs::{read, write, try_exists, create_dir_all};
use thiserror::Error;
use std::{cell::{Ref, RefMut, RefCell}, path::{Path, PathBuf}};
use directories::ProjectDirs;
use log::debug;

use crate::http_client::DEFAULT_API_URL;

const PREF_FILE_NAME: &'static str = "config.json";

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Preferences parse error")]
    SerdeError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("No home directory found for the preferences file")]
    NoConfigDir,
    #[error("Preferences locked")]
    PrefsLocked
}

type Result<T> = std::result::Result<T, PreferencesError>;

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Kinsta API base URL, when not the public one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>
}

impl Preferences {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "itineris", "trellis-kinsta").ok_or(PreferencesError::NoConfigDir)
}

/// Read preferences without creating anything. Defaults when there is no file
pub async fn load() -> Result<Preferences> {
    match project_dirs() {
        Ok(dirs) => load_from(dirs.config_dir()).await,
        Err(_) => Ok(Preferences::default())
    }
}

pub async fn load_from(config_dir: &Path) -> Result<Preferences> {
    let config_path = config_dir.join(PREF_FILE_NAME);
    if try_exists(&config_path).await.unwrap_or(false) {
        debug!("Loading preferences from {}", config_path.display());
        Ok(serde_json::from_slice(&read(config_path).await?)?)
    } else {
        Ok(Preferences::default())
    }
}

#[derive(Debug)]
pub struct DataStore {
    preferences: RefCell<Preferences>,
    config_dir: PathBuf
}

impl DataStore {
    /// Load preferences from the user config dir, creating an empty file if there is none
    pub async fn new() -> Result<Self> {
        let dirs = project_dirs()?;
        Self::in_dir(dirs.config_dir().to_path_buf()).await
    }

    pub async fn in_dir(config_dir: PathBuf) -> Result<Self> {
        let config_path = config_dir.join(PREF_FILE_NAME);
        if try_exists(&config_path).await? {
            debug!("Loading preferences from {}", config_path.display());
            Ok(Self {
                preferences: RefCell::new(serde_json::from_slice(&read(config_path).await?)?),
                config_dir
            })
        } else {
            debug!("Creating preferences at {}", config_path.display());

            create_dir_all(&config_dir).await?;
            write(&config_path, "{}").await?;
            Ok(Self {
                preferences: RefCell::new(Preferences::default()),
                config_dir
            })
        }
    }

    pub async fn save(&self) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(&*self.read()?)?;
        create_dir_all(&self.config_dir).await?;
        write(self.config_dir.join(PREF_FILE_NAME), serialized).await?;
        Ok(())
    }

    pub fn read(&self) -> Result<Ref<'_, Preferences>> {
        self.preferences.try_borrow().map_err(|_| PreferencesError::PrefsLocked)
    }

    pub fn write(&self) -> Result<RefMut<'_, Preferences>> {
        self.preferences.try_borrow_mut().map_err(|_| PreferencesError::PrefsLocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_empty_file() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested");
        let store = DataStore::in_dir(config_dir.clone()).await.unwrap();

        assert_eq!(*store.read().unwrap(), Preferences::default());
        assert_eq!(store.read().unwrap().api_url(), DEFAULT_API_URL);
        assert_eq!(std::fs::read_to_string(config_dir.join(PREF_FILE_NAME)).unwrap(), "{}");
    }

    #[tokio::test]
    async fn saved_values_reload() {
        let dir = tempdir().unwrap();
        let store = DataStore::in_dir(dir.path().to_path_buf()).await.unwrap();
        store.write().unwrap().api_url = Some("http://localhost:8080/v2".into());
        store.save().await.unwrap();

        let reloaded = DataStore::in_dir(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(reloaded.read().unwrap().api_url(), "http://localhost:8080/v2");
    }

    #[tokio::test]
    async fn load_leaves_missing_file_alone() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested");
        assert_eq!(load_from(&config_dir).await.unwrap(), Preferences::default());
        assert!(!config_dir.exists());

        // an unreadable location falls back to defaults too
        assert_eq!(load_from(Path::new("/proc/nonexistent/dir")).await.unwrap(), Preferences::default());
    }

    #[tokio::test]
    async fn load_reads_saved_values() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PREF_FILE_NAME), r#"{"api_url": "http://localhost:1/v2"}"#).unwrap();
        assert_eq!(load_from(dir.path()).await.unwrap().api_url(), "http://localhost:1/v2");
    }

    #[tokio::test]
    async fn borrow_conflict_is_locked() {
        let dir = tempdir().unwrap();
        let store = DataStore::in_dir(dir.path().to_path_buf()).await.unwrap();
        let _guard = store.read().unwrap();
        assert!(matches!(store.write(), Err(PreferencesError::PrefsLocked)));
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PREF_FILE_NAME), "not json").unwrap();
        assert!(matches!(
            DataStore::in_dir(dir.path().to_path_buf()).await,
            Err(PreferencesError::SerdeError(_))
        ));
    }
}
