//! Configuration for the VETZ experience system.
//!
//! Maps directly to `vetz.toml`:
//!
//! ```toml
//! [general]
//! log_level = "info"
//!
//! [curve]
//! kind = "exponential"   # or "linear" for legacy saves
//! base_points = 100.0
//! growth = 1.3
//! linear_step = 100
//!
//! [tracker]
//! max_sink_depth = 16
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::curve::LevelCurve;
use crate::error::{Result, VetzError};

/// Top-level VETZ configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VetzConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Points → level curve.
    #[serde(default)]
    pub curve: CurveConfig,
    /// Tracker behavior.
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl VetzConfig {
    /// Load and validate configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`VetzError::Config`] if the TOML is invalid or fails
    /// [`validate`](Self::validate).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| VetzError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check value ranges that TOML alone cannot express.
    ///
    /// # Errors
    /// Returns [`VetzError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.general.tracing_level()?;
        self.curve.validate()?;
        if self.tracker.max_sink_depth == 0 {
            return Err(VetzError::Config("tracker.max_sink_depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Smallest accepted `curve.growth`. Shallower curves keep every level
/// reachable but push the level cap toward 2^31, and each lookup scans up to
/// the cap.
pub const MIN_GROWTH: f64 = 1.01;

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl GeneralConfig {
    /// `log_level` as a [`tracing::Level`], for the host's subscriber.
    ///
    /// # Errors
    /// Returns [`VetzError::Config`] for an unrecognized level name.
    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| VetzError::Config(format!("general.log_level is not a level: {}", self.log_level)))
    }
}

/// Which level curve a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// `base_points × growth^(L-1)`.
    #[default]
    Exponential,
    /// `linear_step × L`, for saves made with the legacy curve.
    Linear,
}

/// Level curve parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Curve family.
    #[serde(default)]
    pub kind: CurveKind,
    /// Exponential: points for level 1.
    #[serde(default = "default_base_points")]
    pub base_points: f64,
    /// Exponential: per-level multiplier, at least [`MIN_GROWTH`].
    #[serde(default = "default_growth")]
    pub growth: f64,
    /// Linear: points per level.
    #[serde(default = "default_linear_step")]
    pub linear_step: i32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            kind: CurveKind::default(),
            base_points: default_base_points(),
            growth: default_growth(),
            linear_step: default_linear_step(),
        }
    }
}

impl CurveConfig {
    /// Check the parameters of the selected curve.
    ///
    /// # Errors
    /// Returns [`VetzError::Config`] for a non-positive base or step, or a
    /// growth factor below [`MIN_GROWTH`].
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            CurveKind::Exponential => {
                if !(self.base_points.is_finite() && self.base_points > 0.0) {
                    return Err(VetzError::Config(format!(
                        "curve.base_points must be positive, got {}",
                        self.base_points
                    )));
                }
                if !(self.growth.is_finite() && self.growth >= MIN_GROWTH) {
                    return Err(VetzError::Config(format!(
                        "curve.growth must be at least {MIN_GROWTH}, got {}",
                        self.growth
                    )));
                }
            }
            CurveKind::Linear => {
                if self.linear_step <= 0 {
                    return Err(VetzError::Config(format!(
                        "curve.linear_step must be positive, got {}",
                        self.linear_step
                    )));
                }
            }
        }
        Ok(())
    }

    /// The curve these parameters describe.
    #[must_use]
    pub fn build(&self) -> LevelCurve {
        match self.kind {
            CurveKind::Exponential => LevelCurve::Exponential {
                base_points: self.base_points,
                growth: self.growth,
            },
            CurveKind::Linear => LevelCurve::Linear {
                step: self.linear_step,
            },
        }
    }
}

/// Tracker behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Maximum sink hops per call before experience is kept locally.
    #[serde(default = "default_max_sink_depth")]
    pub max_sink_depth: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_sink_depth: default_max_sink_depth(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_points() -> f64 {
    100.0
}
fn default_growth() -> f64 {
    1.3
}
fn default_linear_step() -> i32 {
    100
}
fn default_max_sink_depth() -> u32 {
    16
}
