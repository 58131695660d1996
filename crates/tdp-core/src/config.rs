use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Estimator tuning (optional `[estimator]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of recent progress samples kept for velocity calculation.
    pub window_size: usize,
    /// Starting weight of the historical estimate vs. the live one, in [0, 1].
    pub historical_weight: f64,
    /// How much the historical weight decays per accepted estimate update.
    pub adaptation_rate: f64,
    /// Lower bound the historical weight never decays below.
    pub min_historical_weight: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            historical_weight: 0.6,
            adaptation_rate: 0.2,
            min_historical_weight: 0.2,
        }
    }
}

/// Duration randomization bounds (optional `[randomness]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomnessConfig {
    /// Lower bound of the multiplicative factor applied to the historical average.
    pub min_factor: f64,
    /// Upper bound of the multiplicative factor applied to the historical average.
    pub max_factor: f64,
    /// Shortest base duration in seconds for tasks with no history.
    pub min_base_secs: f64,
    /// Longest base duration in seconds for tasks with no history.
    pub max_base_secs: f64,
    /// Dampening applied to the truncated-normal jitter on the prediction path.
    pub jitter_dampening: f64,
}

impl Default for RandomnessConfig {
    fn default() -> Self {
        Self {
            min_factor: 0.5,
            max_factor: 2.5,
            min_base_secs: 3.0,
            max_base_secs: 45.0,
            jitter_dampening: 0.2,
        }
    }
}

/// Global configuration loaded from `~/.config/tdp/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdpConfig {
    /// Simulated-clock tick interval in milliseconds.
    pub tick_millis: u64,
    /// Capacity of the bounded event queue between producer and consumer.
    /// Small on purpose: a lagging consumer backpressures the producer.
    pub queue_capacity: usize,
    /// Estimator tuning; built-in defaults when the section is missing.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Duration randomization; built-in defaults when the section is missing.
    #[serde(default)]
    pub randomness: RandomnessConfig,
}

impl Default for TdpConfig {
    fn default() -> Self {
        Self {
            tick_millis: 500,
            queue_capacity: 16,
            estimator: EstimatorConfig::default(),
            randomness: RandomnessConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tdp")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TdpConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TdpConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TdpConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TdpConfig::default();
        assert_eq!(cfg.tick_millis, 500);
        assert_eq!(cfg.queue_capacity, 16);
        assert_eq!(cfg.estimator.window_size, 5);
        assert_eq!(cfg.estimator.historical_weight, 0.6);
        assert_eq!(cfg.estimator.adaptation_rate, 0.2);
        assert_eq!(cfg.estimator.min_historical_weight, 0.2);
        assert_eq!(cfg.randomness.min_factor, 0.5);
        assert_eq!(cfg.randomness.max_factor, 2.5);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TdpConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TdpConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.tick_millis, cfg.tick_millis);
        assert_eq!(parsed.queue_capacity, cfg.queue_capacity);
        assert_eq!(parsed.estimator.window_size, cfg.estimator.window_size);
        assert_eq!(parsed.randomness.max_base_secs, cfg.randomness.max_base_secs);
    }

    #[test]
    fn config_toml_sections_default_when_missing() {
        let toml = r#"
            tick_millis = 100
            queue_capacity = 4
        "#;
        let cfg: TdpConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.tick_millis, 100);
        assert_eq!(cfg.queue_capacity, 4);
        assert_eq!(cfg.estimator.window_size, 5);
        assert_eq!(cfg.randomness.min_base_secs, 3.0);
    }

    #[test]
    fn config_toml_custom_sections() {
        let toml = r#"
            tick_millis = 250
            queue_capacity = 8

            [estimator]
            window_size = 8
            historical_weight = 0.8
            adaptation_rate = 0.1
            min_historical_weight = 0.3

            [randomness]
            min_factor = 0.9
            max_factor = 1.1
            min_base_secs = 1.0
            max_base_secs = 5.0
            jitter_dampening = 0.0
        "#;
        let cfg: TdpConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.estimator.window_size, 8);
        assert_eq!(cfg.estimator.historical_weight, 0.8);
        assert_eq!(cfg.estimator.min_historical_weight, 0.3);
        assert_eq!(cfg.randomness.min_factor, 0.9);
        assert_eq!(cfg.randomness.max_base_secs, 5.0);
        assert_eq!(cfg.randomness.jitter_dampening, 0.0);
    }
}
