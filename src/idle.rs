//! Idle animation state machines (blink, mouth)
//!
//! Each animation is a self-rescheduling two-phase cycle:
//! Idle --(delay)--> Active --(duration)--> Idle --(fresh delay)--> ...
//!
//! One owned deadline is outstanding at any time. The event loop polls
//! `tick` every frame; nothing here blocks or sleeps.

use crate::config::AnimationConfig;
use crate::types::{LayerTransform, Vec2};
use rand::Rng;
use rand::rngs::StdRng;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    Blink,
    Mouth,
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationKind::Blink => write!(f, "blink"),
            AnimationKind::Mouth => write!(f, "mouth"),
        }
    }
}

/// A single pending deadline. Cancelling it means it will never fire.
#[derive(Clone, Copy, Debug, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn arm(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed.
    fn take_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub struct IdleAnimation {
    kind: AnimationKind,
    config: AnimationConfig,
    phase: Phase,
    timer: Timer,
    rng: StdRng,
    resting: Vec2, // layer translation captured when the animation began
    cancelled: bool,
}

impl IdleAnimation {
    /// Starts Idle with a freshly sampled delay.
    pub fn new(kind: AnimationKind, config: AnimationConfig, rng: StdRng, now: Instant) -> Self {
        let mut anim = Self {
            kind,
            config,
            phase: Phase::Idle,
            timer: Timer::default(),
            rng,
            resting: Vec2::ZERO,
            cancelled: false,
        };
        anim.schedule_idle(now);
        anim
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    #[cfg(test)]
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Advance the cycle. Returns the new phase when a transition happened.
    /// A missing layer still transitions; only the write is skipped.
    pub fn tick(&mut self, now: Instant, layer: Option<&mut LayerTransform>) -> Option<Phase> {
        if self.cancelled || !self.timer.take_if_due(now) {
            return None;
        }
        match self.phase {
            Phase::Idle => {
                self.begin(now, layer);
            }
            Phase::Active => self.finish(now, layer),
        }
        Some(self.phase)
    }

    /// Cancel the outstanding deadline for good (window teardown).
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.cancelled = true;
        log::debug!("{}: timer cancelled", self.kind);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Enter Active, overlaying our scale on the tracker's last translation.
    /// Returns false when already Active (overlapping fire). The pending
    /// end-of-phase deadline then reschedules the cycle on its own.
    fn begin(&mut self, now: Instant, layer: Option<&mut LayerTransform>) -> bool {
        if self.phase == Phase::Active {
            return false;
        }

        if let Some(layer) = layer {
            self.resting = layer.translate;
            *layer = LayerTransform {
                translate: self.resting,
                scale_x: self.config.scale_x.unwrap_or(1.0),
                scale_y: self.config.scale_y,
                post_translate_y: self.config.translate_y,
                ..*layer
            };
        }

        self.phase = Phase::Active;
        let ms = sample_ms(&mut self.rng, self.config.duration_min_ms, self.config.duration_max_ms);
        self.timer.arm(now + Duration::from_millis(ms));
        log::debug!("{}: idle -> active for {ms} ms", self.kind);
        true
    }

    /// Restore the translate-only transform and go back to waiting.
    fn finish(&mut self, now: Instant, layer: Option<&mut LayerTransform>) {
        if let Some(layer) = layer {
            *layer = LayerTransform {
                rotate_x_deg: layer.rotate_x_deg,
                rotate_y_deg: layer.rotate_y_deg,
                ..LayerTransform::translation(self.resting)
            };
        }
        self.phase = Phase::Idle;
        self.schedule_idle(now);
        log::debug!("{}: active -> idle", self.kind);
    }

    fn schedule_idle(&mut self, now: Instant) {
        let ms = sample_ms(&mut self.rng, self.config.interval_min_ms, self.config.interval_max_ms);
        self.timer.arm(now + Duration::from_millis(ms));
    }
}

/// Uniform in `[min, max]` (inclusive). Callers validate `min <= max`.
fn sample_ms(rng: &mut StdRng, min: u64, max: u64) -> u64 {
    if min >= max { min } else { rng.gen_range(min..=max) }
}
