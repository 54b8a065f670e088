use crate::audit::DEFAULT_LOG_LINES;
use crate::error::Result;
use crate::trigger::DEBOUNCE_DELAY;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Runtime tuning for the acquisition loop. Every field is optional in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum seconds between repeats of the same gesture.
    #[serde(default = "default_debounce_delay")]
    pub debounce_delay_secs: f64,
    /// Audit lines kept for the overlay.
    #[serde(default = "default_log_lines")]
    pub overlay_log_lines: usize,
    /// Wheel notches per scroll action.
    #[serde(default = "default_scroll_amount")]
    pub scroll_amount: i32,
    /// Hands scored below this by the detector are ignored.
    #[serde(default = "default_min_confidence")]
    pub min_detection_confidence: f32,
}

fn default_debounce_delay() -> f64 {
    DEBOUNCE_DELAY
}

fn default_log_lines() -> usize {
    DEFAULT_LOG_LINES
}

fn default_scroll_amount() -> i32 {
    5
}

fn default_min_confidence() -> f32 {
    0.7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_delay_secs: default_debounce_delay(),
            overlay_log_lines: default_log_lines(),
            scroll_amount: default_scroll_amount(),
            min_detection_confidence: default_min_confidence(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.debounce_delay_secs.is_finite() || self.debounce_delay_secs < 0.0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "debounce_delay_secs must be a non-negative number, got {}",
                    self.debounce_delay_secs
                ),
            });
        } else if self.debounce_delay_secs == 0.0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "debounce_delay_secs is 0: a held gesture fires on every frame".into(),
            });
        }

        if self.overlay_log_lines == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "overlay_log_lines is 0: triggered actions will not be shown".into(),
            });
        }

        if self.scroll_amount <= 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("scroll_amount must be positive, got {}", self.scroll_amount),
            });
        }

        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "min_detection_confidence must be within 0.0..=1.0, got {}",
                    self.min_detection_confidence
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(&dir.path().join("handkeys.yaml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.debounce_delay_secs, 0.5);
        assert_eq!(cfg.overlay_log_lines, 5);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("scroll_amount: 12\n").unwrap();
        assert_eq!(cfg.scroll_amount, 12);
        assert_eq!(cfg.min_detection_confidence, 0.7);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handkeys.yaml");
        let cfg = Config {
            debounce_delay_secs: 1.25,
            ..Config::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), cfg);
    }

    #[test]
    fn default_config_is_clean() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_values() {
        let cfg = Config {
            debounce_delay_secs: -1.0,
            overlay_log_lines: 0,
            scroll_amount: 0,
            min_detection_confidence: 1.5,
        };
        let warnings = cfg.validate();
        let errors = warnings.iter().filter(|w| w.level == WarnLevel::Error).count();
        assert_eq!(errors, 3);
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn zero_debounce_is_only_a_warning() {
        let cfg = Config {
            debounce_delay_secs: 0.0,
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }
}
