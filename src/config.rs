//! Configuration management for the exercise alarm

use crate::alarm::ExerciseKind;
use crate::constants::{
    DEFAULT_DELAY_SECONDS, DEFAULT_SMOOTHING_ALPHA, DEFAULT_TARGET_FPS, DEFAULT_TARGET_REPS, DOWN_ANGLE,
    MIN_SIDE_QUALITY, REFRACTORY_MS, STABLE_FRAMES, UP_ANGLE,
};
use crate::filters::AngleFilter;
use crate::rep_counter::RepConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Landmark quality gating
    pub pose: PoseConfig,

    /// Elbow-angle smoothing
    pub smoothing: SmoothingConfig,

    /// Repetition detection thresholds
    pub reps: RepsConfig,

    /// Alarm defaults
    pub alarm: AlarmConfig,

    /// Pose stream cadence
    pub session: SessionConfig,
}

/// Landmark quality gating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Minimum weighted side quality (0.0-1.0)
    pub min_quality: f64,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter type (`exponential` or `none`)
    pub filter: String,

    /// Exponential filter alpha value
    pub alpha: f64,
}

/// Repetition thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepsConfig {
    /// Elbow angle below which the arm is flexed (degrees)
    pub down_angle: f64,

    /// Elbow angle above which the arm is extended (degrees)
    pub up_angle: f64,

    /// Consecutive frames required for a phase change
    pub stable_frames: u32,

    /// Minimum milliseconds between counted repetitions
    pub refractory_ms: u64,
}

/// Alarm defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Exercise required to stop the alarm
    pub exercise: ExerciseKind,

    /// Repetitions required to stop the alarm
    pub target_reps: u32,

    /// Seconds until the alarm rings
    pub delay_seconds: f64,
}

/// Pose stream configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames per second accepted from the pose stream
    pub target_fps: u32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            min_quality: MIN_SIDE_QUALITY,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "exponential".to_string(),
            alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

impl Default for RepsConfig {
    fn default() -> Self {
        Self {
            down_angle: DOWN_ANGLE,
            up_angle: UP_ANGLE,
            stable_frames: STABLE_FRAMES,
            refractory_ms: REFRACTORY_MS,
        }
    }
}

impl Default for AlarmConfig {
    #[allow(clippy::cast_precision_loss)] // Small constant
    fn default() -> Self {
        Self {
            exercise: ExerciseKind::default(),
            target_reps: DEFAULT_TARGET_REPS,
            delay_seconds: DEFAULT_DELAY_SECONDS as f64,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the angle filter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error for unknown filter names or an invalid alpha
    pub fn create_filter(&self) -> Result<Box<dyn AngleFilter>> {
        use crate::filters::{create_filter, exponential::ExponentialFilter};

        match self.smoothing.filter.to_lowercase().as_str() {
            "exponential" | "ema" => Ok(Box::new(ExponentialFilter::try_new(self.smoothing.alpha)?)),
            name => create_filter(name),
        }
    }

    /// Repetition thresholds as used by the counter
    #[must_use]
    pub fn rep_config(&self) -> RepConfig {
        RepConfig {
            down_angle: self.reps.down_angle,
            up_angle: self.reps.up_angle,
            stable_frames: self.reps.stable_frames,
            refractory: Duration::from_millis(self.reps.refractory_ms),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.pose.min_quality) {
            return Err(Error::ConfigError(
                "Minimum quality must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(self.smoothing.alpha > 0.0 && self.smoothing.alpha <= 1.0) {
            return Err(Error::ConfigError("Smoothing alpha must be in (0, 1]".to_string()));
        }

        let angles = 0.0..=180.0;
        if !angles.contains(&self.reps.down_angle) || !angles.contains(&self.reps.up_angle) {
            return Err(Error::ConfigError(
                "Repetition angles must be between 0 and 180 degrees".to_string(),
            ));
        }
        if self.reps.down_angle >= self.reps.up_angle {
            return Err(Error::ConfigError(format!(
                "Down angle ({}) must be below up angle ({})",
                self.reps.down_angle, self.reps.up_angle
            )));
        }
        if self.reps.stable_frames == 0 {
            return Err(Error::ConfigError(
                "Stable frame count must be greater than 0".to_string(),
            ));
        }

        if self.alarm.target_reps == 0 {
            return Err(Error::ConfigError("Target reps must be greater than 0".to_string()));
        }
        if self.session.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Exercise Alarm Configuration

# Landmark quality gating
pose:
  min_quality: 0.25

# Elbow-angle smoothing
smoothing:
  filter: "exponential"
  alpha: 0.25

# Repetition detection
reps:
  down_angle: 110.0
  up_angle: 150.0
  stable_frames: 2
  refractory_ms: 900

# Alarm defaults
alarm:
  exercise: "pushups"
  target_reps: 10
  delay_seconds: 10.0

# Pose stream cadence
session:
  target_fps: 15
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = serde_yaml::from_str("reps:\n  stable_frames: 3\n").unwrap();
        assert_eq!(parsed.reps.stable_frames, 3);
        assert_eq!(parsed.reps.refractory_ms, REFRACTORY_MS);
        assert_eq!(parsed.alarm.target_reps, DEFAULT_TARGET_REPS);
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let mut config = Config::default();
        config.reps.down_angle = 160.0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(msg)) if msg.contains("Down angle")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.pose.min_quality = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.alpha = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.reps.stable_frames = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.alarm.target_reps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.target_fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_create_filter() {
        let mut config = Config::default();
        assert_eq!(config.create_filter().unwrap().name(), "ExponentialFilter");

        config.smoothing.filter = "none".to_string();
        assert_eq!(config.create_filter().unwrap().name(), "NoFilter");

        config.smoothing.filter = "Exponential".to_string();
        config.smoothing.alpha = 2.0;
        assert!(config.create_filter().is_err());

        config.smoothing.filter = "kalman".to_string();
        assert!(config.create_filter().is_err());
    }

    #[test]
    fn test_rep_config() {
        let rep = Config::default().rep_config();
        assert_eq!(rep, RepConfig::default());
    }
}
