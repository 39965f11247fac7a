//! Configuration for playback and serving.
//!
//! Everything has a default, so an empty JSON object is a valid config file.
//! CLI flags are applied on top of whatever the file provides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use odyssey_trace::{Catalog, Registry, SeedConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::playback::PlaybackSpeed;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Auto-advance timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Interval between steps at 1x speed
    #[serde(rename = "base_interval_ms", with = "millis")]
    pub base_interval: Duration,
    /// Initial speed multiplier
    pub speed: PlaybackSpeed,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(1000),
            speed: PlaybackSpeed::NORMAL,
        }
    }
}

/// Full configuration of the `odyssey-vis` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub port: u16,
    pub playback: PlaybackConfig,
    pub seed: SeedConfig,
    /// Content API catalog to serve instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            playback: PlaybackConfig::default(),
            seed: SeedConfig::default(),
            catalog: None,
        }
    }
}

impl VisConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall playback or seed generation.
    pub fn validate(&self) -> Result<()> {
        if self.playback.base_interval.is_zero() {
            return Err(Error::Config("base_interval_ms must be positive".into()));
        }
        if self.seed.max_value < 1 {
            return Err(Error::Config(format!(
                "seed.max_value must be at least 1, got {}",
                self.seed.max_value
            )));
        }
        Ok(())
    }

    /// The catalog to serve: the configured file, or the registry's own metadata.
    pub fn load_catalog(&self, registry: &Registry) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => {
                let catalog = Catalog::from_json(&std::fs::read_to_string(path)?)?;
                info!(path = %path.display(), algorithms = catalog.len(), "loaded catalog");
                Ok(catalog)
            }
            None => Ok(registry.catalog()),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = VisConfig::from_json("{}").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.playback, PlaybackConfig::default());
        assert_eq!(config.seed.size, 10);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = VisConfig::from_json(
            r#"{"port": 8080, "playback": {"speed": 2}, "seed": {"seed": 7}}"#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.playback.speed, PlaybackSpeed::DOUBLE);
        assert_eq!(config.playback.base_interval, Duration::from_millis(1000));
        assert_eq!(config.seed.seed, 7);
        assert_eq!(config.seed.max_value, 100);
    }

    #[test]
    fn interval_is_in_milliseconds() {
        let config = VisConfig::from_json(r#"{"playback": {"base_interval_ms": 250}}"#).unwrap();
        assert_eq!(config.playback.base_interval, Duration::from_millis(250));

        let json = serde_json::to_value(&config.playback).unwrap();
        assert_eq!(json["base_interval_ms"], 250);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            VisConfig::from_json(r#"{"playback": {"base_interval_ms": 0}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            VisConfig::from_json(r#"{"playback": {"speed": 0}}"#),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            VisConfig::from_json(r#"{"seed": {"max_value": 0}}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odyssey.json");
        std::fs::write(&path, r#"{"port": 4000, "seed": {"size": 6}}"#).unwrap();

        let config = VisConfig::load(&path).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.seed.size, 6);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = VisConfig::load(Path::new("/nonexistent/odyssey.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn default_catalog_comes_from_registry() {
        let registry = Registry::standard();
        let catalog = VisConfig::default().load_catalog(&registry).unwrap();
        assert_eq!(catalog.len(), registry.len());
    }
}
