use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::dimension::ScaleContext;
use crate::layers::Rect;

pub const CONFIG_FILE_NAME: &str = "rhythm.toml";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SurfaceSection {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for SurfaceSection {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl SurfaceSection {
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width as f32, self.height as f32)
    }
}

/// Settings read from `rhythm.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RhythmConfig {
    #[serde(default)]
    pub scale: ScaleContext,
    #[serde(default)]
    pub surface: SurfaceSection,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl RhythmConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut cfg: RhythmConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.path = Some(path.to_path_buf());
        Ok(cfg)
    }

    /// Load `path` if given, else the user config file if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
    }

    /// File this config was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// `<config dir>/rhythm/rhythm.toml`
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("rhythm").join(CONFIG_FILE_NAME))
}

fn default_width() -> u32 {
    360
}

fn default_height() -> u32 {
    640
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[scale]\ndensity = 2.0\n\n[surface]\nwidth = 720\n").unwrap();

        let cfg = RhythmConfig::load(&path).unwrap();
        assert_eq!(cfg.scale.density, 2.0);
        assert_eq!(cfg.scale.scaled_density, 1.0);
        assert_eq!(cfg.surface.width, 720);
        assert_eq!(cfg.surface.height, 640);
        assert_eq!(cfg.path(), Some(path.as_path()));
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut cfg = RhythmConfig::default();
        cfg.scale = ScaleContext::with_density(3.0);
        cfg.save(&path).unwrap();
        let loaded = RhythmConfig::load(&path).unwrap();
        assert_eq!(loaded.scale, cfg.scale);
        assert_eq!(loaded.surface, SurfaceSection::default());
    }

    #[test]
    fn bad_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[scale\n").unwrap();
        let err = RhythmConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
        assert!(RhythmConfig::discover(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
