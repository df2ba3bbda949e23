//! Pipeline configuration
//!
//! Loaded from JSON; every field has a default so `{}` is a valid
//! configuration. Unknown keys are rejected.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cachelib::{CacheKey, CacheValue, ComputationCache, LruCache, NullCache};
use crate::errors::{Result, StarframeError};
use crate::precessionlib::PrecessionModel;

/// Top-level settings for a [`crate::planetlib::PipelineContext`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub cache: CacheConfig,
    pub light_time: LightTimeConfig,
    /// Bend astrometric positions by the Sun's gravity
    pub apply_deflection: bool,
    pub precession_model: PrecessionModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// When false the null cache is used
    pub enabled: bool,
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_size: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightTimeConfig {
    pub max_iterations: usize,
    /// Convergence threshold on successive delays, in seconds
    pub tolerance_seconds: f64,
}

impl Default for LightTimeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance_seconds: 1e-12,
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.max_size == 0 {
            return Err(StarframeError::Config(
                "cache.max_size must be at least 1".to_string(),
            ));
        }
        if self.light_time.max_iterations == 0 {
            return Err(StarframeError::Config(
                "light_time.max_iterations must be at least 1".to_string(),
            ));
        }
        let tol = self.light_time.tolerance_seconds;
        if !tol.is_finite() || tol < 0.0 {
            return Err(StarframeError::Config(format!(
                "light_time.tolerance_seconds must be finite and non-negative, got {tol}"
            )));
        }
        Ok(())
    }

    /// The cache strategy these settings select
    pub fn build_cache(&self) -> Result<Arc<dyn ComputationCache>> {
        if self.cache.enabled {
            let cache = LruCache::<CacheKey, CacheValue>::new(self.cache.max_size)?;
            log::debug!("using LRU cache with max_size {}", self.cache.max_size);
            Ok(Arc::new(cache))
        } else {
            Ok(Arc::new(NullCache))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_size, 1024);
        assert_eq!(config.light_time.max_iterations, 10);
        assert_eq!(config.light_time.tolerance_seconds, 1e-12);
        assert!(!config.apply_deflection);
        assert_eq!(config.precession_model, PrecessionModel::Iau1976);
    }

    #[test]
    fn test_partial_document() {
        let config = PipelineConfig::from_json_str(
            r#"{"cache": {"enabled": true}, "precession_model": "iau2006", "apply_deflection": true}"#,
        )
        .unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 1024);
        assert_eq!(config.precession_model, PrecessionModel::Iau2006);
        assert!(config.apply_deflection);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PipelineConfig::from_json_str(r#"{"cache": {"capacity": 3}}"#).unwrap_err();
        assert!(matches!(err, StarframeError::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{"cache": {"max_size": 0}}"#,
            r#"{"light_time": {"max_iterations": 0}}"#,
            r#"{"light_time": {"tolerance_seconds": -1.0}}"#,
        ] {
            assert!(
                matches!(PipelineConfig::from_json_str(json), Err(StarframeError::Config(_))),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn test_cache_selection() {
        let null = PipelineConfig::default().build_cache().unwrap();
        assert_eq!(null.max_size(), 0);

        let mut config = PipelineConfig::default();
        config.cache.enabled = true;
        config.cache.max_size = 8;
        let lru = config.build_cache().unwrap();
        assert_eq!(lru.max_size(), 8);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut config = PipelineConfig::default();
        config.light_time.max_iterations = 4;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load("/nonexistent/starframe.json").unwrap_err();
        assert!(matches!(err, StarframeError::Io(_)));
    }
}
