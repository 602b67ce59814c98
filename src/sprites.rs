// Layer images for the face, eyes and mouth.
// Visual: each sprite is a full-frame transparent image; stacked, they make
// the face. Without configured PNGs we paint simple built-in ones.

use crate::config::AssetsConfig;
use crate::error::Error;
use crate::rig::LayerSet;
use std::path::Path;

/// Built-in sprites are painted at the default window size.
const DEFAULT_W: usize = 300;
const DEFAULT_H: usize = 100;

/// Straight-alpha image, one 0xAARRGGBB per pixel.
#[derive(Clone)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Sprite {
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Decode any format the `image` crate knows (PNG in practice).
    pub fn load(path: &Path) -> Result<Self, Error> {
        let img = image::open(path)
            .map_err(|e| Error::AssetLoad { path: path.display().to_string(), reason: e.to_string() })?
            .to_rgba8();
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(Error::AssetLoad { path: path.display().to_string(), reason: "empty image".into() });
        }

        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for p in img.pixels() {
            let [r, g, b, a] = p.0;
            pixels.push(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32);
        }
        Ok(Self { width: w as usize, height: h as usize, pixels })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Filled ellipse with a 1-pixel soft edge.
    /// Visual: smooth-looking blobs instead of jagged stair steps.
    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rgb: u32) {
        if rx <= 0.0 || ry <= 0.0 { return; }
        let x0 = (cx - rx - 1.0).floor().max(0.0) as usize;
        let x1 = ((cx + rx + 1.0).ceil() as usize).min(self.width);
        let y0 = (cy - ry - 1.0).floor().max(0.0) as usize;
        let y1 = ((cy + ry + 1.0).ceil() as usize).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (x as f32 + 0.5 - cx) / rx;
                let dy = (y as f32 + 0.5 - cy) / ry;
                let d = (dx * dx + dy * dy).sqrt();
                // distance past the rim in (roughly) pixels
                let edge_px = (d - 1.0) * rx.min(ry);
                let cover = (0.5 - edge_px).clamp(0.0, 1.0);
                if cover <= 0.0 { continue; }

                let idx = y * self.width + x;
                let old_a = (self.pixels[idx] >> 24) as f32 / 255.0;
                let a = cover.max(old_a);
                self.pixels[idx] = (((a * 255.0).round() as u32) << 24) | (rgb & 0x00FF_FFFF);
            }
        }
    }
}

/// Round yellow head.
pub fn default_face() -> Sprite {
    let mut s = Sprite::blank(DEFAULT_W, DEFAULT_H);
    s.fill_ellipse(150.0, 50.0, 44.0, 44.0, 0x00F5_C542);
    s
}

/// Two dark eyes above the middle.
pub fn default_eyes() -> Sprite {
    let mut s = Sprite::blank(DEFAULT_W, DEFAULT_H);
    s.fill_ellipse(134.0, 40.0, 5.0, 7.0, 0x0022_1A10);
    s.fill_ellipse(166.0, 40.0, 5.0, 7.0, 0x0022_1A10);
    s
}

/// Flat mouth below the middle.
pub fn default_mouth() -> Sprite {
    let mut s = Sprite::blank(DEFAULT_W, DEFAULT_H);
    s.fill_ellipse(150.0, 68.0, 14.0, 3.5, 0x0062_2A1C);
    s
}

pub struct LayerSprites {
    pub face: Option<Sprite>,
    pub eyes: Option<Sprite>,
    pub mouth: Option<Sprite>,
}

impl LayerSprites {
    /// Configured images, falling back to built-ins for unset paths.
    /// A configured image that fails to load leaves its layer empty.
    pub fn load(assets: &AssetsConfig) -> Self {
        Self {
            face: load_layer("face", assets.face.as_deref(), default_face),
            eyes: load_layer("eyes", assets.eyes.as_deref(), default_eyes),
            mouth: load_layer("mouth", assets.mouth.as_deref(), default_mouth),
        }
    }

    pub fn layer_set(&self) -> LayerSet {
        LayerSet {
            face: self.face.is_some(),
            eyes: self.eyes.is_some(),
            mouth: self.mouth.is_some(),
        }
    }
}

fn load_layer(name: &str, path: Option<&Path>, builtin: fn() -> Sprite) -> Option<Sprite> {
    let Some(path) = path else {
        return Some(builtin());
    };
    match Sprite::load(path) {
        Ok(sprite) => {
            log::info!("{name} layer: {} ({}x{})", path.display(), sprite.width, sprite.height);
            Some(sprite)
        }
        Err(e) => {
            log::warn!("{name} layer disabled: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_builtins_have_visible_pixels() {
        for sprite in [default_face(), default_eyes(), default_mouth()] {
            assert_eq!((sprite.width, sprite.height), (DEFAULT_W, DEFAULT_H));
            assert!(sprite.pixels.iter().any(|p| p >> 24 == 0xFF));
            // corners stay transparent
            assert_eq!(sprite.get(0, 0) >> 24, 0);
        }
    }

    #[test]
    fn test_missing_file_disables_layer() {
        let assets = AssetsConfig {
            face: None,
            eyes: Some(PathBuf::from("/definitely/not/here/eyes.png")),
            mouth: None,
        };
        let sprites = LayerSprites::load(&assets);
        let set = sprites.layer_set();
        assert!(set.face);
        assert!(!set.eyes);
        assert!(set.mouth);
    }

    #[test]
    fn test_load_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 0]));
        img.save(&path).unwrap();

        let sprite = Sprite::load(&path).unwrap();
        assert_eq!(sprite.get(0, 0), 0xFFFF_0000);
        assert_eq!(sprite.get(1, 0) >> 24, 0);
    }
}
