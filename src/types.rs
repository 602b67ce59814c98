// Core types shared by the tracker, the idle animations, the resize controller
// and the compositor.

use std::fmt;
use std::ops::{Mul, Sub};

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the overlay is on screen (pixels)
    pub height: usize,     // how tall the overlay is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0xAARRGGBB for minifb (alpha used by transparent windows)
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate when the window changed size; keeps the buffer otherwise.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0u32; width * height];
        }
    }

    /// Visual: everything becomes fully transparent (desktop shows through).
    pub fn clear(&mut self) {
        for p in &mut self.pixels { *p = 0; }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean norm.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 { Vec2::new(self.x * rhs, self.y * rhs) }
}

/// One absolute screen-space pointer reading from the cursor feed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorSample {
    pub x: f32,
    pub y: f32,
}

impl CursorSample {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Window position and size in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowBounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// The four image planes of the face, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Head,  // container only; children inherit its rotation
    Face,
    Mouth,
    Eyes,
}

/// Structured per-layer transform. Components are kept apart so the idle
/// animations can overlay scale without losing the tracker's translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTransform {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    pub translate: Vec2,        // px, applied first
    pub scale_x: f32,
    pub scale_y: f32,
    pub post_translate_y: f32,  // px, applied after scaling (animation offset)
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LayerTransform {
    pub const IDENTITY: LayerTransform = LayerTransform {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        translate: Vec2::ZERO,
        scale_x: 1.0,
        scale_y: 1.0,
        post_translate_y: 0.0,
    };

    pub fn rotation(rotate_x_deg: f32, rotate_y_deg: f32) -> Self {
        Self { rotate_x_deg, rotate_y_deg, ..Self::IDENTITY }
    }

    pub fn translation(translate: Vec2) -> Self {
        Self { translate, ..Self::IDENTITY }
    }
}

/// CSS-like rendering, identity parts omitted. Handy in logs and tests.
impl fmt::Display for LayerTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.rotate_x_deg != 0.0 {
            parts.push(format!("rotateX({}deg)", self.rotate_x_deg));
        }
        if self.rotate_y_deg != 0.0 {
            parts.push(format!("rotateY({}deg)", self.rotate_y_deg));
        }
        if self.translate != Vec2::ZERO {
            parts.push(format!("translate({}px,{}px)", self.translate.x, self.translate.y));
        }
        if self.scale_x != 1.0 {
            parts.push(format!("scaleX({})", self.scale_x));
        }
        if self.scale_y != 1.0 {
            parts.push(format!("scaleY({})", self.scale_y));
        }
        if self.post_translate_y != 0.0 {
            parts.push(format!("translateY({}px)", self.post_translate_y));
        }
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_of_bounds() {
        let b = WindowBounds::new(100, 100, 300, 100);
        assert_eq!(b.center(), Vec2::new(250.0, 150.0));
    }

    #[test]
    fn test_display_omits_identity_parts() {
        assert_eq!(LayerTransform::IDENTITY.to_string(), "none");

        let t = LayerTransform::translation(Vec2::new(3.0, -2.0));
        assert_eq!(t.to_string(), "translate(3px,-2px)");

        let blink = LayerTransform { scale_y: 0.1, ..t };
        assert_eq!(blink.to_string(), "translate(3px,-2px) scaleY(0.1)");
    }

    #[test]
    fn test_frame_buffer_resize_reallocates() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.pixels[0] = 0xFF00_0000;
        fb.resize(4, 2);
        assert_eq!(fb.pixels[0], 0xFF00_0000);
        fb.resize(3, 3);
        assert_eq!(fb.pixels.len(), 9);
        assert!(fb.pixels.iter().all(|p| *p == 0));
    }
}
