//! Overlay configuration
//!
//! Loaded once at startup from `face-follow.toml` (or a path given on the
//! command line), then overridden by a few environment variables. There is
//! no hot reload: the tracker and the idle animations keep the snapshot they
//! were built with.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "face-follow.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Frame geometry, cursor polling and debug toggles
    pub window: WindowConfig,
    /// Head-tracking sensitivity
    pub tracking: TrackingConfig,
    /// Whether the face layer follows the cursor at 0.7x or stays put
    pub face_policy: FacePolicy,
    /// Eye blink timing and shape
    #[serde(deserialize_with = "blink_section")]
    pub blink: AnimationConfig,
    /// Mouth "talk" timing and shape
    #[serde(deserialize_with = "mouth_section")]
    pub mouth: AnimationConfig,
    /// Layer images; unset entries use the built-in sprites
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    /// Initial screen position; `None` lets the platform choose
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// Cursor feed cadence in milliseconds
    pub cursor_interval_ms: u64,
    /// Thickness of the invisible resize strips along each edge
    pub handle_thickness: i32,
    /// Start with the debug outline visible
    pub debug_outline: bool,
    pub target_fps: usize,
}

/// Head-tracking parameters. Both distances are used as divisors.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Distance (px) at which rotation dampening bottoms out
    pub rotation_distance: f32,
    /// Degrees
    pub max_head_rotation: f32,
    /// Pixels
    pub max_eye_translation: f32,
    /// Distance (px) at which eye translation reaches full strength
    pub translation_distance: f32,
}

/// What the face layer does while the head tracks the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacePolicy {
    /// Face translates with the mouth at 0.7x of the eye offset
    #[default]
    Follow,
    /// Face only inherits the head rotation
    Fixed,
}

/// One self-rescheduling idle animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub interval_min_ms: u64,
    pub interval_max_ms: u64,
    pub duration_min_ms: u64,
    pub duration_max_ms: u64,
    pub scale_y: f32,
    pub scale_x: Option<f32>,
    pub translate_y: f32,
}

/// A partially written `[blink]` / `[mouth]` table. Missing keys fall back
/// to that animation's own defaults, not to a shared one.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AnimationPatch {
    interval_min_ms: Option<u64>,
    interval_max_ms: Option<u64>,
    /// Shorthand for a fixed duration (sets both bounds)
    duration_ms: Option<u64>,
    duration_min_ms: Option<u64>,
    duration_max_ms: Option<u64>,
    scale_y: Option<f32>,
    scale_x: Option<f32>,
    translate_y: Option<f32>,
}

impl AnimationPatch {
    fn apply(self, mut base: AnimationConfig) -> AnimationConfig {
        if let Some(ms) = self.duration_ms {
            base.duration_min_ms = ms;
            base.duration_max_ms = ms;
        }
        if let Some(v) = self.interval_min_ms { base.interval_min_ms = v; }
        if let Some(v) = self.interval_max_ms { base.interval_max_ms = v; }
        if let Some(v) = self.duration_min_ms { base.duration_min_ms = v; }
        if let Some(v) = self.duration_max_ms { base.duration_max_ms = v; }
        if let Some(v) = self.scale_y { base.scale_y = v; }
        if self.scale_x.is_some() { base.scale_x = self.scale_x; }
        if let Some(v) = self.translate_y { base.translate_y = v; }
        base
    }
}

fn blink_section<'de, D: Deserializer<'de>>(d: D) -> Result<AnimationConfig, D::Error> {
    AnimationPatch::deserialize(d).map(|p| p.apply(AnimationConfig::blink()))
}

fn mouth_section<'de, D: Deserializer<'de>>(d: D) -> Result<AnimationConfig, D::Error> {
    AnimationPatch::deserialize(d).map(|p| p.apply(AnimationConfig::mouth()))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AssetsConfig {
    pub face: Option<PathBuf>,
    pub eyes: Option<PathBuf>,
    pub mouth: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 100,
            x: None,
            y: None,
            cursor_interval_ms: 50,
            handle_thickness: 6,
            debug_outline: false,
            target_fps: 60,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            rotation_distance: 400.0,
            max_head_rotation: 15.0,
            max_eye_translation: 8.0,
            translation_distance: 200.0,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tracking: TrackingConfig::default(),
            face_policy: FacePolicy::default(),
            blink: AnimationConfig::blink(),
            mouth: AnimationConfig::mouth(),
            assets: AssetsConfig::default(),
        }
    }
}

impl AnimationConfig {
    /// Quick squash every few seconds, fixed 150 ms.
    pub fn blink() -> Self {
        Self {
            interval_min_ms: 2000,
            interval_max_ms: 6000,
            duration_min_ms: 150,
            duration_max_ms: 150,
            scale_y: 0.1,
            scale_x: None,
            translate_y: 0.0,
        }
    }

    /// Open-and-narrow for a random 200-500 ms.
    pub fn mouth() -> Self {
        Self {
            interval_min_ms: 3000,
            interval_max_ms: 8000,
            duration_min_ms: 200,
            duration_max_ms: 500,
            scale_y: 1.4,
            scale_x: Some(0.9),
            translate_y: 2.0,
        }
    }
}

impl TrackingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance("tracking.rotation_distance", self.rotation_distance)?;
        check_distance("tracking.translation_distance", self.translation_distance)
    }
}

impl AnimationConfig {
    pub fn validate(&self, section: &'static str) -> Result<(), ConfigError> {
        if self.interval_min_ms > self.interval_max_ms {
            return Err(ConfigError::InvertedRange {
                field: section,
                min: self.interval_min_ms,
                max: self.interval_max_ms,
            });
        }
        if self.duration_min_ms > self.duration_max_ms {
            return Err(ConfigError::InvertedRange {
                field: section,
                min: self.duration_min_ms,
                max: self.duration_max_ms,
            });
        }
        check_scale(section, self.scale_y)?;
        if let Some(sx) = self.scale_x {
            check_scale(section, sx)?;
        }
        Ok(())
    }
}

fn check_distance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDistance { field, value })
    }
}

fn check_scale(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveScale { field, value })
    }
}

impl OverlayConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `face-follow.toml` from the current directory, or defaults if it
    /// doesn't exist. A file that exists but fails to parse is still an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Environment variables take precedence over file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("FACE_FOLLOW_POLICY") {
            match val.to_ascii_lowercase().as_str() {
                "follow" => self.face_policy = FacePolicy::Follow,
                "fixed" => self.face_policy = FacePolicy::Fixed,
                other => log::warn!("ignoring FACE_FOLLOW_POLICY={other}"),
            }
        }
        if let Ok(val) = std::env::var("FACE_FOLLOW_CURSOR_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.window.cursor_interval_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FACE_FOLLOW_DEBUG") {
            self.window.debug_outline = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracking.validate()?;
        self.blink.validate("blink")?;
        self.mouth.validate("mouth")
    }
}
