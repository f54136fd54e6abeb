//! Palette configuration.
//!
//! Maps product codes to color table files:
//!
//! ```yaml
//! palettes:
//!   - name: reflectivity
//!     file: palettes/reflectivity.pal
//!     product_codes: [19, 20, 94, 153, 180]
//! ```
//!
//! Relative `file` paths resolve against the directory holding the YAML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use renderer::ColorTable;
use serde::Deserialize;
use tracing::{debug, info};

/// Root of a palette configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteConfig {
    #[serde(default)]
    pub palettes: Vec<PaletteEntry>,

    /// Directory relative paths resolve against. Set on load.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// One palette and the products it colors.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub file: PathBuf,
    #[serde(default)]
    pub product_codes: Vec<i16>,
}

impl PaletteConfig {
    /// Load a palette configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read palette config: {}", path.display()))?;

        let mut config: PaletteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse palette config: {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        info!(
            path = %path.display(),
            palettes = config.palettes.len(),
            "Loaded palette configuration"
        );
        Ok(config)
    }

    /// Load the config if the file exists, otherwise an empty one.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No palette configuration found");
            Ok(Self {
                palettes: Vec::new(),
                base_dir: PathBuf::new(),
            })
        }
    }

    /// First palette entry listing `product_code`.
    pub fn entry_for(&self, product_code: i16) -> Option<&PaletteEntry> {
        self.palettes
            .iter()
            .find(|entry| entry.product_codes.contains(&product_code))
    }

    /// Absolute-or-relative path of an entry's color table file.
    pub fn resolve(&self, entry: &PaletteEntry) -> PathBuf {
        if entry.file.is_absolute() {
            entry.file.clone()
        } else {
            self.base_dir.join(&entry.file)
        }
    }

    /// Parse the color table configured for `product_code`, if any.
    pub fn color_table_for(&self, product_code: i16) -> Result<Option<(String, ColorTable)>> {
        let Some(entry) = self.entry_for(product_code) else {
            return Ok(None);
        };
        let path = self.resolve(entry);
        let table = ColorTable::from_file(&path)
            .with_context(|| format!("Failed to load palette {}: {}", entry.name, path.display()))?;
        Ok(Some((entry.name.clone(), table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
palettes:
  - name: reflectivity
    file: palettes/reflectivity.pal
    product_codes: [94, 153]
  - name: velocity
    file: /opt/palettes/velocity.pal
    product_codes: [99]
"#;

    #[test]
    fn test_parse_config() {
        let config: PaletteConfig = serde_yaml::from_str(CONFIG).unwrap();
        assert_eq!(config.palettes.len(), 2);
        assert_eq!(config.entry_for(153).unwrap().name, "reflectivity");
        assert!(config.entry_for(161).is_none());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let mut config: PaletteConfig = serde_yaml::from_str(CONFIG).unwrap();
        config.base_dir = PathBuf::from("/etc/level3");

        let reflectivity = config.entry_for(94).unwrap();
        assert_eq!(
            config.resolve(reflectivity),
            PathBuf::from("/etc/level3/palettes/reflectivity.pal")
        );
        let velocity = config.entry_for(99).unwrap();
        assert_eq!(
            config.resolve(velocity),
            PathBuf::from("/opt/palettes/velocity.pal")
        );
    }

    #[test]
    fn test_load_and_color_table_for() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("palettes")).unwrap();
        std::fs::write(
            dir.path().join("palettes/reflectivity.pal"),
            test_utils::palettes::REFLECTIVITY,
        )
        .unwrap();
        let config_path = dir.path().join("palettes.yaml");
        std::fs::write(&config_path, CONFIG).unwrap();

        let config = PaletteConfig::load(&config_path).unwrap();
        let (name, table) = config.color_table_for(94).unwrap().unwrap();
        assert_eq!(name, "reflectivity");
        assert_eq!(table.product, "BR");

        assert!(config.color_table_for(161).unwrap().is_none());
        // Configured but missing on disk
        assert!(config.color_table_for(99).is_err());
    }

    #[test]
    fn test_load_optional_missing() {
        let config = PaletteConfig::load_optional(Path::new("/nonexistent/palettes.yaml")).unwrap();
        assert!(config.palettes.is_empty());
    }
}
