pub mod config;
pub mod download;
pub mod options;
pub mod url;

use anyhow::Result;
use std::path::PathBuf;

use config::ConfigStore;
use options::{Invocation, Options};

/// One wallpaper run: the config store plus the merged options driving it.
pub struct NaturePaper {
    store: ConfigStore,
    options: Options,
}

impl NaturePaper {
    pub async fn new(store: ConfigStore, invocation: Invocation) -> Self {
        let options = store.load(&invocation).await;
        Self { store, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Downloads one wallpaper, forwarding progress percentages to `reporter`,
    /// and returns the path of the written file.
    pub async fn fetch<F>(&self, reporter: F) -> Result<PathBuf>
    where
        F: FnMut(f64),
    {
        let url = url::build_url(&self.options);
        download::download(&self.options, &url, reporter).await
    }

    /// Writes the current width, height and directory back to disk.
    pub async fn persist(&self) -> Result<()> {
        self.store.save(&self.options).await
    }
}
