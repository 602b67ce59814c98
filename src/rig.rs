//! Face rig: the four layer transforms plus everything that writes them.
//!
//! The tracker writes on every cursor sample, the idle animations write on
//! their own deadlines. While an animation is Active the tracker skips that
//! layer's translation (suppression, not queuing); head rotation is always
//! applied.

use crate::config::OverlayConfig;
use crate::error::ConfigError;
use crate::idle::{AnimationKind, IdleAnimation, Phase};
use crate::tracking::HeadTracker;
use crate::types::{CursorSample, Layer, LayerTransform, WindowBounds};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

/// Which layers have something to draw. The head container always exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSet {
    pub face: bool,
    pub eyes: bool,
    pub mouth: bool,
}

impl LayerSet {
    #[cfg(test)]
    pub const ALL: LayerSet = LayerSet { face: true, eyes: true, mouth: true };
}

pub struct FaceRig {
    tracker: HeadTracker,
    blink: IdleAnimation,
    mouth_anim: IdleAnimation,
    head: LayerTransform,
    face: Option<LayerTransform>,
    eyes: Option<LayerTransform>,
    mouth: Option<LayerTransform>,
}

impl FaceRig {
    pub fn new(config: &OverlayConfig, layers: LayerSet, now: Instant) -> Result<Self, ConfigError> {
        Self::with_rngs(config, layers, now, StdRng::from_entropy(), StdRng::from_entropy())
    }

    /// Same as `new` with caller-provided randomness for the two cycles.
    pub fn with_rngs(
        config: &OverlayConfig,
        layers: LayerSet,
        now: Instant,
        blink_rng: StdRng,
        mouth_rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let tracker = HeadTracker::new(config.tracking, config.face_policy)?;
        let present = |on: bool| on.then_some(LayerTransform::IDENTITY);

        Ok(Self {
            tracker,
            blink: IdleAnimation::new(AnimationKind::Blink, config.blink, blink_rng, now),
            mouth_anim: IdleAnimation::new(AnimationKind::Mouth, config.mouth, mouth_rng, now),
            head: LayerTransform::IDENTITY,
            face: present(layers.face),
            eyes: present(layers.eyes),
            mouth: present(layers.mouth),
        })
    }

    /// Handle one cursor sample against the latest window bounds.
    pub fn apply_sample(&mut self, sample: CursorSample, bounds: &WindowBounds) {
        let pose = self.tracker.pose(sample, bounds);

        self.head = LayerTransform::rotation(pose.head_rotate_x, pose.head_rotate_y);

        if !self.blink.is_active() {
            if let Some(eyes) = self.eyes.as_mut() {
                *eyes = LayerTransform::translation(pose.eyes);
            }
        }
        if !self.mouth_anim.is_active() {
            if let Some(mouth) = self.mouth.as_mut() {
                *mouth = LayerTransform::translation(pose.mouth);
            }
        }
        if let Some(face) = self.face.as_mut() {
            *face = LayerTransform::translation(pose.face);
        }
    }

    /// Drive both idle cycles. Returns the transitions that happened.
    pub fn tick(&mut self, now: Instant) -> Vec<(AnimationKind, Phase)> {
        let mut changes = Vec::new();
        if let Some(phase) = self.blink.tick(now, self.eyes.as_mut()) {
            changes.push((AnimationKind::Blink, phase));
        }
        if let Some(phase) = self.mouth_anim.tick(now, self.mouth.as_mut()) {
            changes.push((AnimationKind::Mouth, phase));
        }
        changes
    }

    /// Cancel every outstanding timer. Call before the window goes away.
    pub fn shutdown(&mut self) {
        self.blink.cancel();
        self.mouth_anim.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.blink.is_cancelled() && self.mouth_anim.is_cancelled()
    }

    pub fn transform(&self, layer: Layer) -> Option<LayerTransform> {
        match layer {
            Layer::Head => Some(self.head),
            Layer::Face => self.face,
            Layer::Eyes => self.eyes,
            Layer::Mouth => self.mouth,
        }
    }

    #[cfg(test)]
    pub fn blink(&self) -> &IdleAnimation {
        &self.blink
    }

    #[cfg(test)]
    pub fn mouth(&self) -> &IdleAnimation {
        &self.mouth_anim
    }
}
