use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scene::SceneParams;

/// Startup settings, optionally read from a JSON file. Missing fields fall
/// back to the scene as designed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub star_count: usize,
    pub particle_count: usize,
    pub bead_count: usize,
    pub model_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            star_count: 3000,
            particle_count: 150,
            bead_count: 200,
            model_path: None,
            seed: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {:?}", path))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse settings file {:?}", path))?;
        Ok(settings)
    }

    /// Model path resolution: CLI flag, then settings file, then the
    /// MODEL_FILE environment variable, then the bundled default.
    pub fn resolve_model_path(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        if let Some(path) = &self.model_path {
            return path.clone();
        }
        std::env::var("MODEL_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets/ufo.glb"))
    }

    /// Scene construction parameters. The seed resolves CLI first, settings
    /// second, entropy last, so runs are reproducible exactly when asked.
    pub fn scene_params(&self, cli_seed: Option<u64>) -> SceneParams {
        SceneParams {
            star_count: self.star_count,
            particle_count: self.particle_count,
            bead_count: self.bead_count,
            seed: cli_seed.or(self.seed).unwrap_or_else(rand::random),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.star_count, 3000);
        assert_eq!(settings.particle_count, 150);
        assert_eq!(settings.bead_count, 200);
        assert!(settings.model_path.is_none());
        assert!(settings.seed.is_none());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let settings: Settings =
            serde_json::from_str(r#"{"particle_count": 40, "seed": 11}"#).unwrap();
        assert_eq!(settings.particle_count, 40);
        assert_eq!(settings.seed, Some(11));
        assert_eq!(settings.star_count, 3000);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result: std::result::Result<Settings, _> = serde_json::from_str("{not json");
        assert!(result.is_err());
    }

    #[test]
    fn cli_seed_wins_over_settings_seed() {
        let settings = Settings {
            seed: Some(5),
            ..Settings::default()
        };
        assert_eq!(settings.scene_params(Some(9)).seed, 9);
        assert_eq!(settings.scene_params(None).seed, 5);
    }

    #[test]
    fn cli_model_path_wins() {
        let settings = Settings {
            model_path: Some(PathBuf::from("from-settings.glb")),
            ..Settings::default()
        };
        let cli = PathBuf::from("from-cli.glb");

        assert_eq!(settings.resolve_model_path(Some(&cli)), cli);
        assert_eq!(
            settings.resolve_model_path(None),
            PathBuf::from("from-settings.glb")
        );
    }
}
