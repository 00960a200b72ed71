use crate::{
    domain::SortMode,
    error::{PinboardError, Result},
    storage::SortPreferenceStore,
};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Sort preferences kept as one JSON object (`{"todo": "alpha", ...}`)
/// under the project's `.pinboard` directory
pub struct JsonSortPreferences {
    root_path: PathBuf,
}

impl JsonSortPreferences {
    const PINBOARD_DIR: &'static str = ".pinboard";
    const SORTS_FILE: &'static str = "column-sorts.json";

    /// Creates a store for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::PINBOARD_DIR),
        }
    }

    fn sorts_file(&self) -> PathBuf {
        self.root_path.join(Self::SORTS_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Reads the raw map; a missing file is an empty map
    async fn load(&self) -> Result<BTreeMap<String, String>> {
        let file_path = self.sorts_file();

        if !file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&file_path).await?;
        let modes: BTreeMap<String, String> = serde_json::from_str(&contents).map_err(|err| {
            PinboardError::StorageError(format!(
                "corrupt sort preferences at {}: {}",
                file_path.display(),
                err
            ))
        })?;

        Ok(modes)
    }
}

#[async_trait]
impl SortPreferenceStore for JsonSortPreferences {
    async fn get(&self, column: &str) -> Result<Option<SortMode>> {
        let modes = self.load().await?;
        // Unrecognised stored keys behave as the default mode.
        Ok(modes.get(column).map(|key| SortMode::from_key(key)))
    }

    async fn set(&self, column: &str, mode: SortMode) -> Result<()> {
        let mut modes = self.load().await?;
        modes.insert(column.to_string(), mode.as_key().to_string());

        self.ensure_directory_exists(&self.root_path).await?;
        let json = serde_json::to_string_pretty(&modes)?;
        fs::write(self.sorts_file(), json).await?;

        Ok(())
    }
}
