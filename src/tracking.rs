//! Head-tracking transform engine
//!
//! Pure mapping from (cursor sample, window bounds) to per-layer values.
//! Rotation goes on the head container only; eyes, mouth and face are its
//! children and inherit it when composited.

use crate::config::{FacePolicy, TrackingConfig};
use crate::error::ConfigError;
use crate::types::{CursorSample, Vec2, WindowBounds};

/// Rotation never fully fades, even far from the window.
pub const MIN_ROTATION_DAMPENING: f32 = 0.1;
/// Mouth and face follow the eyes at this fraction.
pub const SECONDARY_FOLLOW: f32 = 0.7;

/// Output of one tracking step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub head_rotate_x: f32, // degrees, positive when the cursor is above center
    pub head_rotate_y: f32, // degrees, positive when the cursor is right of center
    pub eyes: Vec2,         // px
    pub mouth: Vec2,        // px
    pub face: Vec2,         // px
}

/// `max(0.1, 1 - distance / rotation_distance)`
pub fn rotation_dampening(distance: f32, rotation_distance: f32) -> f32 {
    (1.0 - distance / rotation_distance).max(MIN_ROTATION_DAMPENING)
}

/// `min(1, distance / translation_distance)`
pub fn translation_dampening(distance: f32, translation_distance: f32) -> f32 {
    (distance / translation_distance).min(1.0)
}

#[derive(Clone, Debug)]
pub struct HeadTracker {
    config: TrackingConfig,
    face_policy: FacePolicy,
}

impl HeadTracker {
    /// Refuses to build with a zero, negative or non-finite divisor.
    pub fn new(config: TrackingConfig, face_policy: FacePolicy) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, face_policy })
    }

    pub fn pose(&self, sample: CursorSample, bounds: &WindowBounds) -> Pose {
        let cfg = &self.config;
        let v = sample.as_vec2() - bounds.center();
        let distance = v.length();

        // Head: strongest near the window, floored far away.
        let rd = rotation_dampening(distance, cfg.rotation_distance);
        let head_rotate_y = (v.x / cfg.rotation_distance) * cfg.max_head_rotation * rd;
        // Screen Y grows downward; looking up needs the opposite tilt.
        let head_rotate_x = -(v.y / cfg.rotation_distance) * cfg.max_head_rotation * rd;

        // Eyes: independent curve, grows with distance up to the cap.
        let td = translation_dampening(distance, cfg.translation_distance);
        let eyes = (v * (1.0 / cfg.rotation_distance)) * (cfg.max_eye_translation * td);
        let mouth = eyes * SECONDARY_FOLLOW;
        let face = match self.face_policy {
            FacePolicy::Follow => mouth,
            FacePolicy::Fixed => Vec2::ZERO,
        };

        Pose { head_rotate_x, head_rotate_y, eyes, mouth, face }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn tracker(config: TrackingConfig) -> HeadTracker {
        HeadTracker::new(config, FacePolicy::Follow).unwrap()
    }

    #[test]
    fn test_cursor_at_center_is_neutral() {
        let t = tracker(TrackingConfig::default());
        let bounds = WindowBounds::new(100, 100, 300, 100);
        let pose = t.pose(CursorSample::new(250.0, 150.0), &bounds);

        assert!(approx(pose.head_rotate_x, 0.0));
        assert!(approx(pose.head_rotate_y, 0.0));
        assert_eq!(pose.eyes.length(), 0.0);
        assert_eq!(pose.mouth.length(), 0.0);
        assert_eq!(pose.face.length(), 0.0);
    }

    #[test]
    fn test_cursor_above_tilts_head_up() {
        let cfg = TrackingConfig {
            rotation_distance: 400.0,
            max_head_rotation: 15.0,
            ..TrackingConfig::default()
        };
        let bounds = WindowBounds::new(100, 100, 300, 100);
        let pose = tracker(cfg).pose(CursorSample::new(250.0, 50.0), &bounds);

        // center (250,150), v = (0,-100), dampening 0.75
        assert!(approx(pose.head_rotate_x, 2.8125));
        assert!(approx(pose.head_rotate_y, 0.0));
    }

    #[test]
    fn test_rotation_floor_holds_far_away() {
        for d in [400.0, 401.0, 1000.0, 1.0e6] {
            assert!(approx(rotation_dampening(d, 400.0), MIN_ROTATION_DAMPENING));
        }
        assert!(approx(rotation_dampening(0.0, 400.0), 1.0));
        assert!(approx(rotation_dampening(200.0, 400.0), 0.5));
    }

    #[test]
    fn test_translation_cap_holds_far_away() {
        for d in [200.0, 250.0, 5000.0] {
            assert!(approx(translation_dampening(d, 200.0), 1.0));
        }
        assert!(approx(translation_dampening(0.0, 200.0), 0.0));
        assert!(approx(translation_dampening(50.0, 200.0), 0.25));
    }

    #[test]
    fn test_eye_translation_keeps_sign() {
        let cfg = TrackingConfig::default(); // 400 / 15 / 8 / 200
        let bounds = WindowBounds::new(0, 0, 200, 200);
        let pose = tracker(cfg).pose(CursorSample::new(100.0, 400.0), &bounds);

        // v = (0, 300), td = 1 -> eyes.y = 300/400 * 8
        assert!(approx(pose.eyes.x, 0.0));
        assert!(approx(pose.eyes.y, 6.0));
        assert!(approx(pose.mouth.y, 6.0 * SECONDARY_FOLLOW));
        // cursor below: head tilts down
        assert!(pose.head_rotate_x < 0.0);
    }

    #[test]
    fn test_fixed_face_policy_leaves_face_alone() {
        let t = HeadTracker::new(TrackingConfig::default(), FacePolicy::Fixed).unwrap();
        let bounds = WindowBounds::new(0, 0, 200, 200);
        let pose = t.pose(CursorSample::new(350.0, 20.0), &bounds);

        assert_eq!(pose.face, Vec2::ZERO);
        assert!(pose.mouth.length() > 0.0);
    }

    #[test]
    fn test_follow_face_policy_matches_mouth() {
        let bounds = WindowBounds::new(0, 0, 200, 200);
        let pose = tracker(TrackingConfig::default()).pose(CursorSample::new(-40.0, 90.0), &bounds);
        assert_eq!(pose.face, pose.mouth);
    }

    #[test]
    fn test_zero_distance_config_refused() {
        let cfg = TrackingConfig { translation_distance: 0.0, ..TrackingConfig::default() };
        assert!(matches!(
            HeadTracker::new(cfg, FacePolicy::Follow),
            Err(ConfigError::NonPositiveDistance { .. })
        ));
    }
}
