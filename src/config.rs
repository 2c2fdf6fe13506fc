use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::error::IconError;

pub const CONFIG_FILE: &str = "favicons.json";

/// Where the generator reads the logo from and writes the icons to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub public_dir: PathBuf,
    pub source: String,
    pub background: [u8; 4],
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            source: "clyvuum-logo-dark.png".to_string(),
            background: [10, 10, 10, 255],
        }
    }
}

impl GeneratorConfig {
    /// Reads `path` if it exists, otherwise returns the defaults.
    /// A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, IconError> {
        if !path.exists() {
            log::info!("Config file does not exist at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| IconError::io(path, e))?;
        let config = serde_json::from_str::<GeneratorConfig>(&content).map_err(|e| {
            IconError::Config {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn source_path(&self) -> PathBuf {
        self.public_dir.join(&self.source)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.public_dir.join(name)
    }
}
