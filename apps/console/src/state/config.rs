//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`INVENTORY_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Database file used when `INVENTORY_DB_PATH` is not set.
pub const DEFAULT_DB_PATH: &str = "inventory.db";

/// Image directory used when `INVENTORY_IMAGE_DIR` is not set.
pub const DEFAULT_IMAGE_DIR: &str = "product_images";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file, relative to the working directory unless
    /// absolute.
    pub database_path: PathBuf,

    /// Directory that bare product image file names are resolved against.
    pub image_dir: PathBuf,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: `inventory.db`
    /// - Images: `product_images/`
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
        }
    }
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `INVENTORY_DB_PATH`: Override the database file
    /// - `INVENTORY_IMAGE_DIR`: Override the product image directory
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable lookup. Blank values are ignored.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = non_blank("INVENTORY_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(dir) = non_blank("INVENTORY_IMAGE_DIR") {
            config.image_dir = PathBuf::from(dir);
        }

        config
    }

    /// Resolves the image path typed on the product form.
    ///
    /// A bare file name ("widget.png") is placed under `image_dir`; any
    /// other path is kept as typed. Blank input stays blank.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.resolve_image_path("widget.png"), "product_images/widget.png");
    /// assert_eq!(config.resolve_image_path("/srv/img/a.png"), "/srv/img/a.png");
    /// ```
    pub fn resolve_image_path(&self, input: &str) -> String {
        let trimmed = input.trim();
        let path = Path::new(trimmed);
        let mut components = path.components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => {
                self.image_dir.join(name).to_string_lossy().into_owned()
            }
            _ => trimmed.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(vars(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_path, PathBuf::from("inventory.db"));
        assert_eq!(config.image_dir, PathBuf::from("product_images"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("INVENTORY_DB_PATH", "/var/lib/shop/stock.db"),
            ("INVENTORY_IMAGE_DIR", "/var/lib/shop/images"),
        ]));

        assert_eq!(config.database_path, PathBuf::from("/var/lib/shop/stock.db"));
        assert_eq!(config.image_dir, PathBuf::from("/var/lib/shop/images"));
    }

    #[test]
    fn test_blank_override_ignored() {
        let config = AppConfig::from_vars(vars(&[("INVENTORY_DB_PATH", "  ")]));
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_bare_image_name_goes_under_image_dir() {
        let config = AppConfig::default();

        let resolved = config.resolve_image_path(" widget.png ");
        assert_eq!(
            PathBuf::from(resolved),
            Path::new("product_images").join("widget.png")
        );
    }

    #[test]
    fn test_image_paths_with_directories_kept() {
        let config = AppConfig::default();

        assert_eq!(config.resolve_image_path("/srv/img/a.png"), "/srv/img/a.png");
        assert_eq!(config.resolve_image_path("img/a.png"), "img/a.png");
        assert_eq!(config.resolve_image_path(""), "");
    }
}
