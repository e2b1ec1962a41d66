//! Application configuration, loaded from TOML.
//!
//! ```toml
//! viewport_height = 600
//! placeholder_delay_ms = 1000
//!
//! [[tutorials]]
//! kind = "touch_distance"
//! finger_size = 2.0
//!
//! [[tutorials]]
//! name = "numberOf"
//! kind = "finger_count"
//! active = false
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TutorialError};
use crate::tutorial::TutorialKind;

// ════════════════════════════════════════════════════════════════════════════
// TutorialConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TutorialConfig {
    /// Container name; defaults to the demo's stock name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(flatten)]
    pub kind: TutorialKind,
}

impl TutorialConfig {
    pub fn new(kind: TutorialKind) -> Self {
        TutorialConfig { name: None, active: true, kind }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.default_name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Height of the host viewport; each canvas takes 80% of it.
    pub viewport_height:      f32,
    /// How long a tutorial waits for a device before showing the placeholder.
    pub placeholder_delay_ms: u64,
    /// Tutorial shown first in the viewer.
    pub initial_tab:          usize,
    pub tutorials:            Vec<TutorialConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            viewport_height:      600.0,
            placeholder_delay_ms: 1000,
            initial_tab:          0,
            tutorials: TutorialKind::all_defaults().into_iter().map(TutorialConfig::new).collect(),
        }
    }
}

fn default_true() -> bool { true }

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TutorialError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| TutorialError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), tutorials = config.tutorials.len(), "config loaded");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TutorialError::InvalidConfig(e.to_string()))
    }

    pub fn placeholder_delay(&self) -> Duration {
        Duration::from_millis(self.placeholder_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("viewport", "viewport_height", self.viewport_height, MAX_VIEWPORT_HEIGHT)?;
        if self.tutorials.is_empty() {
            return Err(invalid("at least one tutorial is required"));
        }
        if self.initial_tab >= self.tutorials.len() {
            return Err(invalid(format!(
                "initial_tab {} out of range for {} tutorials",
                self.initial_tab,
                self.tutorials.len()
            )));
        }

        let mut seen = HashSet::new();
        for t in &self.tutorials {
            let name = t.name();
            if !seen.insert(name) {
                return Err(invalid(format!("duplicate tutorial name '{}'", name)));
            }
            validate_kind(name, &t.kind)?;
        }
        Ok(())
    }
}

const MAX_VIEWPORT_HEIGHT: f32 = 4000.0;
const MAX_FINGER_SIZE:     f32 = 10.0;
const MAX_CELL_SIZE:       f32 = 2000.0;
const MAX_SPEED_REDUCTION: f32 = 100_000.0;
const MAX_GOOD_THRESHOLD:  f32 = 100.0;

/// `value` must be finite and in `(0, max]`.  NaN fails every comparison,
/// so the test is written as a negated range.
fn check_positive(name: &str, field: &str, value: f32, max: f32) -> Result<()> {
    if !(value > 0.0 && value <= max) {
        return Err(invalid(format!("{}: {} must be in (0, {}], got {}", name, field, max, value)));
    }
    Ok(())
}

fn validate_kind(name: &str, kind: &TutorialKind) -> Result<()> {
    match kind {
        TutorialKind::TouchDistance { finger_size } => {
            check_positive(name, "finger_size", *finger_size, MAX_FINGER_SIZE)
        }
        TutorialKind::TouchScroll { cell_size, momentum, .. } => {
            check_positive(name, "cell_size", *cell_size, MAX_CELL_SIZE)?;
            check_positive(name, "momentum", *momentum, 1.0)
        }
        TutorialKind::FingerCount { history: 0 } | TutorialKind::TouchSpeed { history: 0, .. } => {
            Err(invalid(format!("{}: history must be at least 1", name)))
        }
        TutorialKind::TouchSpeed { speed_reduction, good_threshold, .. } => {
            check_positive(name, "speed_reduction", *speed_reduction, MAX_SPEED_REDUCTION)?;
            check_positive(name, "good_threshold", *good_threshold, MAX_GOOD_THRESHOLD)
        }
        _ => Ok(()),
    }
}

fn invalid(msg: impl Into<String>) -> TutorialError {
    TutorialError::InvalidConfig(msg.into())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_all_five_tutorials() {
        let cfg = AppConfig::default();
        let names: Vec<&str> = cfg.tutorials.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["touchDistance", "touchScroll", "numberOf", "touchSpeed", "readMore"]);
        assert!(cfg.tutorials.iter().all(|t| t.active));
        assert_eq!(cfg.placeholder_delay(), Duration::from_secs(1));
        cfg.validate().unwrap();
    }

    #[test]
    fn parses_partial_file() {
        let cfg: AppConfig = toml::from_str(
            r#"
            viewport_height = 400

            [[tutorials]]
            kind = "touch_scroll"
            momentum = 0.9

            [[tutorials]]
            name = "speed"
            kind = "touch_speed"
            active = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.viewport_height, 400.0);
        assert_eq!(cfg.placeholder_delay_ms, 1000);
        assert_eq!(cfg.tutorials.len(), 2);
        assert_eq!(
            cfg.tutorials[0].kind,
            TutorialKind::TouchScroll { cell_size: 100.0, momentum: 0.9, scroll_x: true, scroll_y: true }
        );
        assert_eq!(cfg.tutorials[1].name(), "speed");
        assert!(!cfg.tutorials[1].active);
        cfg.validate().unwrap();
    }

    #[test]
    fn default_survives_toml() {
        let cfg = AppConfig::default();
        let text = cfg.to_toml().unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn rejects_unknown_kind() {
        let r: std::result::Result<AppConfig, _> = toml::from_str(
            r#"
            [[tutorials]]
            kind = "pinch_zoom"
            "#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut cfg = AppConfig::default();
        cfg.tutorials.push(TutorialConfig::new(TutorialKind::FingerCount { history: 5 }));
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("numberOf"));
    }

    #[test]
    fn rejects_bad_parameters() {
        let bad = [
            TutorialKind::FingerCount { history: 0 },
            TutorialKind::TouchScroll { cell_size: 0.0, momentum: 0.98, scroll_x: true, scroll_y: true },
            TutorialKind::TouchScroll { cell_size: 100.0, momentum: 1.5, scroll_x: true, scroll_y: true },
            TutorialKind::TouchScroll { cell_size: 100.0, momentum: 0.0, scroll_x: true, scroll_y: true },
            TutorialKind::TouchScroll { cell_size: f32::NAN, momentum: 0.98, scroll_x: true, scroll_y: true },
            TutorialKind::TouchScroll { cell_size: f32::INFINITY, momentum: 0.98, scroll_x: true, scroll_y: true },
            TutorialKind::TouchScroll { cell_size: 100.0, momentum: f32::NAN, scroll_x: true, scroll_y: true },
            TutorialKind::TouchDistance { finger_size: f32::NAN },
            TutorialKind::TouchDistance { finger_size: 1e7 },
            TutorialKind::TouchDistance { finger_size: -1.0 },
            TutorialKind::TouchSpeed { history: 21, speed_reduction: f32::NAN, good_threshold: 0.5 },
            TutorialKind::TouchSpeed { history: 21, speed_reduction: 1e9, good_threshold: 0.5 },
            TutorialKind::TouchSpeed { history: 21, speed_reduction: 300.0, good_threshold: f32::NAN },
            TutorialKind::TouchSpeed { history: 21, speed_reduction: 300.0, good_threshold: f32::INFINITY },
            TutorialKind::TouchSpeed { history: 21, speed_reduction: 300.0, good_threshold: -0.5 },
        ];
        for kind in bad {
            let cfg = AppConfig { tutorials: vec![TutorialConfig::new(kind.clone())], ..Default::default() };
            assert!(
                matches!(cfg.validate(), Err(TutorialError::InvalidConfig(_))),
                "accepted {:?}",
                kind
            );
        }
    }

    #[test]
    fn rejects_non_finite_values_from_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [[tutorials]]
            kind = "touch_scroll"
            cell_size = nan

            [[tutorials]]
            kind = "touch_distance"
            finger_size = nan
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(TutorialError::InvalidConfig(_))));

        let cfg: AppConfig = toml::from_str("viewport_height = inf").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_tab() {
        let cfg = AppConfig { initial_tab: 5, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AppConfig::load("/nonexistent/touch_tutorials.toml").unwrap_err();
        assert!(matches!(err, TutorialError::ConfigRead { .. }));
    }

    #[test]
    fn load_reports_parse_error() {
        let dir = std::env::temp_dir().join(format!("touch_tutorials_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "viewport_height = \"tall\"").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, TutorialError::ConfigParse { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }
}
