//! Editor preferences, persisted in the platform config directory.

use crate::{ContentMap, ContentValue, statics, store};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last applied content root; `None` means auto-detect.
    pub content_root: Option<String>,
    pub dark_theme: bool,
    /// Keep `<entity>.json.bak` next to each saved file.
    pub backups: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_root: None,
            dark_theme: true,
            backups: false,
        }
    }
}

impl Settings {
    /// `<config dir>/portfolio-editor/settings.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(statics::SETTINGS_DIR).join(statics::SETTINGS_FILE))
    }

    /// Missing or malformed settings give the defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("reading settings {path:?}: {e}");
                }
                return Self::default();
            }
        };
        json5::from_str(&text).unwrap_or_else(|e| {
            log::warn!("ignoring malformed settings {path:?}: {e}");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), store::StoreError> {
        store::write(path, &self.to_value())
    }

    pub fn to_value(&self) -> ContentValue {
        let mut map = ContentMap::new();
        map.insert("content_root".to_string(), self.content_root.clone().into());
        map.insert("dark_theme".to_string(), self.dark_theme.into());
        map.insert("backups".to_string(), self.backups.into());
        ContentValue::Object(map)
    }
}

/// Project root from `PORTFOLIO_PROJECT_ROOT`, else the working directory.
pub fn project_root_from_env() -> PathBuf {
    std::env::var_os(statics::ENV_PROJECT_ROOT)
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Content root override from `PORTFOLIO_CONTENT_ROOT`.
pub fn content_root_from_env() -> Option<PathBuf> {
    std::env::var_os(statics::ENV_CONTENT_ROOT)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_and_malformed_settings_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::write(&path, "{ dark_theme: ").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn settings_roundtrip_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            content_root: Some("site/public/content".to_string()),
            dark_theme: false,
            backups: true,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"backups": true, "window": [1, 2]}"#).unwrap();
        let loaded = Settings::load(&path);
        assert!(loaded.backups);
        assert!(loaded.dark_theme);
    }
}
