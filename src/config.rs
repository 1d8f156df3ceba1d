use anyhow::{Context, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::path::PathBuf;
use tokio::fs;

use crate::options::{Invocation, Options};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_DIR: &str = ".";

lazy_static! {
    static ref DEFAULT_CONFIG_PATH: PathBuf = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nature-paper")
        .join("config.json");
}

/// Conventional config location under the user config directory.
pub fn default_path() -> PathBuf {
    DEFAULT_CONFIG_PATH.clone()
}

/// On-disk preference file. Every field is optional on read so a partial or
/// hand-edited file still merges cleanly; unknown fields are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedConfig {
    width: Option<u32>,
    height: Option<u32>,
    dir: Option<String>,
}

/// Reads and writes the saved preferences at an explicitly injected path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Merges built-in defaults, the saved file and the current invocation,
    /// in increasing priority. A missing or unparseable file counts as "no
    /// saved config" rather than an error.
    pub async fn load(&self, invocation: &Invocation) -> Options {
        let saved = match fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str::<SavedConfig>(&text).unwrap_or_default(),
            Err(_) => SavedConfig::default(),
        };

        Options {
            width: invocation.width.or(saved.width).unwrap_or(DEFAULT_WIDTH),
            height: invocation.height.or(saved.height).unwrap_or(DEFAULT_HEIGHT),
            dir: invocation
                .dir
                .clone()
                .or(saved.dir)
                .unwrap_or_else(|| DEFAULT_DIR.to_string()),
            image: invocation.image.clone(),
            gravity: invocation.gravity,
            random: invocation.random,
            latest: invocation.latest,
            grayscale: invocation.grayscale,
            blur: invocation.blur,
        }
    }

    /// Persists exactly `{width, height, dir}`, overwriting any prior file.
    /// The file keeps its historical 4-space-indented shape.
    pub async fn save(&self, options: &Options) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let record = SavedConfig {
            width: Some(options.width),
            height: Some(options.height),
            dir: Some(options.dir.clone()),
        };

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record.serialize(&mut serializer)?;

        fs::write(&self.path, buf)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let options = store.load(&Invocation::default()).await;
        assert_eq!(options.width, DEFAULT_WIDTH);
        assert_eq!(options.height, DEFAULT_HEIGHT);
        assert_eq!(options.dir, DEFAULT_DIR);
    }

    #[tokio::test]
    async fn garbage_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "not json at all{{").await.unwrap();

        let store = ConfigStore::new(path);
        let options = store.load(&Invocation::default()).await;
        assert_eq!(options.width, DEFAULT_WIDTH);
    }

    #[tokio::test]
    async fn merge_prefers_invocation_over_file_over_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"width": 800}"#).await.unwrap();

        let invocation = Invocation {
            height: Some(600),
            ..Default::default()
        };
        let store = ConfigStore::new(path);
        let options = store.load(&invocation).await;

        assert_eq!(options.width, 800);
        assert_eq!(options.height, 600);
        assert_eq!(options.dir, DEFAULT_DIR);
    }

    #[tokio::test]
    async fn save_then_load_roundtrips_the_three_fields() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let saved = store
            .load(&Invocation {
                width: Some(10),
                height: Some(20),
                dir: Some("/tmp".to_string()),
                ..Default::default()
            })
            .await;
        store.save(&saved).await.unwrap();

        let loaded = store.load(&Invocation::default()).await;
        assert_eq!(loaded.width, 10);
        assert_eq!(loaded.height, 20);
        assert_eq!(loaded.dir, "/tmp");
    }

    #[tokio::test]
    async fn save_writes_four_space_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);

        let options = store
            .load(&Invocation {
                width: Some(10),
                height: Some(20),
                dir: Some("/tmp".to_string()),
                ..Default::default()
            })
            .await;
        store.save(&options).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("\n    \"width\": 10"));
        assert!(text.contains("\"dir\": \"/tmp\""));
    }

    #[tokio::test]
    async fn unknown_fields_are_dropped_on_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"width": 640, "theme": "dark"}"#)
            .await
            .unwrap();

        let store = ConfigStore::new(&path);
        let options = store.load(&Invocation::default()).await;
        store.save(&options).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("\"width\": 640"));
        assert!(!text.contains("theme"));
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = ConfigStore::new(&path);

        let options = store.load(&Invocation::default()).await;
        store.save(&options).await.unwrap();
        assert!(path.exists());
    }
}
