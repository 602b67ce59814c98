// Software compositor: stacks the layer sprites into the window frame.
// Visual expectation: the face turns toward the pointer (head rotation with a
// little perspective), eyes/mouth slide inside it, blinks squash the eyes.
//
// Every destination pixel is mapped *back* into sprite space, so there are
// no holes however the layer is rotated or scaled.

use crate::rig::FaceRig;
use crate::sprites::{LayerSprites, Sprite};
use crate::types::{FrameBuffer, Layer, LayerTransform, Vec2};

/// Viewer distance in pixels for the head's 3-D tilt.
const PERSPECTIVE: f32 = 600.0;

/// Plane of the head container after rotation, projected with perspective.
/// Inverse-maps a screen offset (from window center) to head-plane coords.
struct HeadPlane {
    r1: [f32; 3], // image of the plane's x axis
    r2: [f32; 3], // image of the plane's y axis
}

impl HeadPlane {
    fn new(head: &LayerTransform) -> Self {
        let a = head.rotate_x_deg.to_radians();
        let b = head.rotate_y_deg.to_radians();
        // rotate X first, then Y; +x turns away when looking right,
        // the top turns away when looking up (screen y grows downward)
        Self {
            r1: [b.cos(), 0.0, -b.sin()],
            r2: [a.sin() * b.sin(), a.cos(), a.sin() * b.cos()],
        }
    }

    /// Solve `q = d/(d - Pz) * (Px, Py)` for the plane point (u, v).
    fn unproject(&self, q: Vec2) -> Option<Vec2> {
        let d = PERSPECTIVE;
        let (r1, r2) = (self.r1, self.r2);
        let a11 = d * r1[0] + q.x * r1[2];
        let a12 = d * r2[0] + q.x * r2[2];
        let a21 = d * r1[1] + q.y * r1[2];
        let a22 = d * r2[1] + q.y * r2[2];
        let det = a11 * a22 - a12 * a21;
        if det.abs() < 1e-6 {
            return None;
        }
        let (bx, by) = (q.x * d, q.y * d);
        Some(Vec2::new((bx * a22 - a12 * by) / det, (a11 * by - bx * a21) / det))
    }
}

/// Blend `src` (straight alpha, 0xAARRGGBB) over the pixel at `idx`.
#[inline]
fn blend_over(fb: &mut FrameBuffer, idx: usize, src: u32) {
    let sa = (src >> 24) & 0xFF;
    if sa == 0 { return; }
    if sa == 0xFF {
        fb.pixels[idx] = src;
        return;
    }

    let dst = fb.pixels[idx];
    let sa_f = sa as f32 / 255.0;
    let da_f = ((dst >> 24) & 0xFF) as f32 / 255.0;
    let out_a = sa_f + da_f * (1.0 - sa_f);
    if out_a <= 0.0 { return; }

    let mix = |shift: u32| -> u32 {
        let s = ((src >> shift) & 0xFF) as f32;
        let d = ((dst >> shift) & 0xFF) as f32;
        let v = (s * sa_f + d * da_f * (1.0 - sa_f)) / out_a;
        v.round().clamp(0.0, 255.0) as u32
    };
    let a = (out_a * 255.0).round() as u32;
    fb.pixels[idx] = (a << 24) | (mix(16) << 16) | (mix(8) << 8) | mix(0);
}

/// Draw one sprite stretched to the frame, through the head rotation and the
/// layer's own translate / scale / post-translate.
pub fn draw_layer(fb: &mut FrameBuffer, sprite: &Sprite, head: &LayerTransform, layer: &LayerTransform) {
    if fb.width == 0 || fb.height == 0 { return; }
    if layer.scale_x == 0.0 || layer.scale_y == 0.0 { return; }

    let plane = HeadPlane::new(head);
    let cx = fb.width as f32 / 2.0;
    let cy = fb.height as f32 / 2.0;
    let to_sprite_x = sprite.width as f32 / fb.width as f32;
    let to_sprite_y = sprite.height as f32 / fb.height as f32;

    for y in 0..fb.height {
        for x in 0..fb.width {
            let q = Vec2::new(x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
            let Some(p) = plane.unproject(q) else { continue };

            // undo translate(t) scale(s) translateY(post)
            let lx = (p.x - layer.translate.x) / layer.scale_x;
            let ly = (p.y - layer.translate.y) / layer.scale_y - layer.post_translate_y;

            let sx = (lx + cx) * to_sprite_x;
            let sy = (ly + cy) * to_sprite_y;
            if sx < 0.0 || sy < 0.0 { continue; }
            let (sx, sy) = (sx as usize, sy as usize);
            if sx >= sprite.width || sy >= sprite.height { continue; }

            blend_over(fb, y * fb.width + x, sprite.get(sx, sy));
        }
    }
}

/// Clear the frame and draw face, mouth, eyes (back to front).
/// Layers without a sprite or without a transform are skipped.
pub fn compose(fb: &mut FrameBuffer, rig: &FaceRig, sprites: &LayerSprites) {
    fb.clear();
    let head = rig.transform(Layer::Head).unwrap_or_default();

    let stack = [
        (Layer::Face, sprites.face.as_ref()),
        (Layer::Mouth, sprites.mouth.as_ref()),
        (Layer::Eyes, sprites.eyes.as_ref()),
    ];
    for (layer, sprite) in stack {
        if let (Some(sprite), Some(t)) = (sprite, rig.transform(layer)) {
            draw_layer(fb, sprite, &head, &t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFFFF_0000;

    /// 20x10 sprite with a single opaque pixel.
    fn dot(x: usize, y: usize) -> Sprite {
        let mut s = Sprite::blank(20, 10);
        s.pixels[y * 20 + x] = RED;
        s
    }

    fn opaque(fb: &FrameBuffer) -> Vec<(usize, usize)> {
        (0..fb.pixels.len())
            .filter(|i| fb.pixels[*i] >> 24 == 0xFF)
            .map(|i| (i % fb.width, i / fb.width))
            .collect()
    }

    #[test]
    fn test_identity_copies_sprite() {
        let mut fb = FrameBuffer::new(20, 10);
        draw_layer(&mut fb, &dot(3, 4), &LayerTransform::IDENTITY, &LayerTransform::IDENTITY);
        assert_eq!(opaque(&fb), vec![(3, 4)]);
    }

    #[test]
    fn test_translation_shifts_pixels() {
        let mut fb = FrameBuffer::new(20, 10);
        let t = LayerTransform::translation(Vec2::new(5.0, -2.0));
        draw_layer(&mut fb, &dot(3, 4), &LayerTransform::IDENTITY, &t);
        assert_eq!(opaque(&fb), vec![(8, 2)]);
    }

    #[test]
    fn test_sprite_is_stretched_to_frame() {
        let mut fb = FrameBuffer::new(40, 20);
        draw_layer(&mut fb, &dot(3, 4), &LayerTransform::IDENTITY, &LayerTransform::IDENTITY);
        let hits = opaque(&fb);
        assert_eq!(hits.len(), 4);
        assert!(hits.contains(&(6, 8)) && hits.contains(&(7, 9)));
    }

    #[test]
    fn test_head_turn_narrows_the_face() {
        let mut full = Sprite::blank(100, 10);
        for p in &mut full.pixels { *p = RED; }

        let mut fb = FrameBuffer::new(100, 10);
        let head = LayerTransform::rotation(0.0, 15.0);
        draw_layer(&mut fb, &full, &head, &LayerTransform::IDENTITY);

        let row: Vec<bool> = (0..100).map(|x| fb.pixels[5 * 100 + x] >> 24 == 0xFF).collect();
        assert!(row[50]);
        assert!(!row[0] || !row[99]); // at least one edge pulled in
    }

    #[test]
    fn test_blend_over_half_alpha() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.pixels[0] = 0xFF00_0000; // opaque black
        blend_over(&mut fb, 0, 0x80FF_FFFF);
        let v = fb.pixels[0];
        assert_eq!(v >> 24, 0xFF);
        let r = (v >> 16) & 0xFF;
        assert!((127..=129).contains(&r));
    }
}
