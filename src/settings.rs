use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving the log output instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Directory holding the `Stack N.json` files. `None` uses the `Stacks`
    /// directory next to the executable.
    #[serde(default)]
    pub stacks_dir: Option<String>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            stacks_dir: None,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Root directory for stored stacks.
    pub fn stacks_root(&self) -> PathBuf {
        match self.stacks_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => crate::stacks::default_stacks_root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "debug_logging": true, "stacks_dir": "D:/stacks" }"#).unwrap();
        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert!(settings.debug_logging);
        assert!(settings.enable_toasts);
        assert_eq!(settings.toast_duration, 3.0);
        assert_eq!(settings.stacks_root(), PathBuf::from("D:/stacks"));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let settings = Settings {
            log_file: Some("air.log".into()),
            enable_toasts: false,
            ..Settings::default()
        };
        settings.save(path).unwrap();
        let loaded = Settings::load(path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.log_file_path(), Some(PathBuf::from("air.log")));
    }

    #[test]
    fn blank_log_file_is_ignored() {
        let settings = Settings {
            log_file: Some("   ".into()),
            ..Settings::default()
        };
        assert_eq!(settings.log_file_path(), None);
    }
}
