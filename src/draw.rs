// Overlay window + software drawing utilities.
// Visual effects provided here:
// 1) A frameless, always-on-top, transparent window that shows the face.
// 2) Invisible resize strips along every edge and corner.
// 3) A debug outline: frame border, handle strips, crosshair and a tiny
//    5x7 bitmap HUD with the cursor coordinates.

use crate::error::Error;
use crate::resize::{Geometry, ResizeDirection};
use crate::types::{CursorSample, FrameBuffer, WindowBounds};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,               // the on-screen overlay you see
    title: String,
    target_fps: usize,
    bounds: WindowBounds,         // latest bounds applied through `Geometry`
    surface: (usize, usize),      // size the native window was built with
}

fn overlay_options() -> WindowOptions {
    WindowOptions {
        borderless: true,
        title: false,
        resize: false,
        topmost: true,
        transparency: true,
        scale_mode: ScaleMode::Stretch, // mid-drag frames stretch until rebuild
        ..WindowOptions::default()
    }
}

fn open_window(title: &str, bounds: &WindowBounds, target_fps: usize) -> Result<Window, Error> {
    let mut window = Window::new(title, bounds.width as usize, bounds.height as usize, overlay_options())
        .map_err(|e| Error::WindowInit(e.to_string()))?;
    window.set_position(bounds.x as isize, bounds.y as isize);
    window.set_target_fps(target_fps);
    Ok(window)
}

impl Drawer {
    /// Create the overlay at `bounds`.
    /// Visual: a borderless transparent window appears above everything else.
    pub fn new(title: &str, bounds: WindowBounds, target_fps: usize) -> Result<Self, Error> {
        let window = open_window(title, &bounds, target_fps)?;
        Ok(Self {
            window,
            title: title.to_string(),
            target_fps,
            bounds,
            surface: (bounds.width as usize, bounds.height as usize),
        })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// minifb can't resize a live window, so a new size lands here: the
    /// native window is rebuilt at the latest bounds. Called after a drag.
    pub fn rebuild_if_resized(&mut self) -> Result<bool, Error> {
        let wanted = (self.bounds.width as usize, self.bounds.height as usize);
        if wanted == self.surface {
            return Ok(false);
        }
        self.window = open_window(&self.title, &self.bounds, self.target_fps)?;
        self.surface = wanted;
        log::debug!("surface rebuilt at {}x{}", wanted.0, wanted.1);
        Ok(true)
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Escape or Q closes the overlay (there's no title bar to do it).
    pub fn quit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_down(Key::Q)
    }

    // we flip a boolean in main to show / hide the debug outline.
    pub fn b_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::B, KeyRepeat::No)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Pointer in window pixels, not clamped (may be outside the window).
    pub fn local_mouse(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Pass)
    }

    /// Pointer in absolute screen pixels: window origin + local position.
    pub fn screen_cursor(&self) -> Option<CursorSample> {
        let (lx, ly) = self.local_mouse()?;
        let (wx, wy) = self.window.get_position();
        Some(CursorSample::new(wx as f32 + lx, wy as f32 + ly))
    }

    /// Which resize strip (if any) is under the pointer.
    pub fn handle_under_mouse(&self, thickness: i32) -> Option<ResizeDirection> {
        let (x, y) = self.local_mouse()?;
        handle_at(x, y, self.surface.0 as f32, self.surface.1 as f32, thickness as f32)
    }
}

impl Geometry for Drawer {
    fn bounds(&self) -> WindowBounds {
        self.bounds
    }

    /// Position applies at once; size is realised by `rebuild_if_resized`.
    fn set_bounds(&mut self, bounds: WindowBounds) {
        if bounds.x != self.bounds.x || bounds.y != self.bounds.y {
            self.window.set_position(bounds.x as isize, bounds.y as isize);
        }
        self.bounds = bounds;
    }
}

/// Hit-test the handle strips of a `w` x `h` window.
pub fn handle_at(x: f32, y: f32, w: f32, h: f32, thickness: f32) -> Option<ResizeDirection> {
    if x < 0.0 || y < 0.0 || x >= w || y >= h {
        return None;
    }
    let left = x < thickness;
    let right = x >= w - thickness;
    let top = y < thickness;
    let bottom = y >= h - thickness;

    match (top, bottom, left, right) {
        (true, _, true, _) => Some(ResizeDirection::TopLeft),
        (true, _, _, true) => Some(ResizeDirection::TopRight),
        (_, true, true, _) => Some(ResizeDirection::BottomLeft),
        (_, true, _, true) => Some(ResizeDirection::BottomRight),
        (true, _, _, _) => Some(ResizeDirection::Top),
        (_, true, _, _) => Some(ResizeDirection::Bottom),
        (_, _, true, _) => Some(ResizeDirection::Left),
        (_, _, _, true) => Some(ResizeDirection::Right),
        _ => None,
    }
}

/* ---------- Software drawing: pixels, outline, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Frame border plus the eight handle strips.
/// Visual: a red rectangle hugging the window, strips tinted translucent red.
pub fn draw_outline(fb: &mut FrameBuffer, thickness: i32, color: u32) {
    let w = fb.width as i32;
    let h = fb.height as i32;
    if w == 0 || h == 0 { return; }

    let strip = (color & 0x00FF_FFFF) | 0x5000_0000;
    for y in 0..h {
        for x in 0..w {
            if handle_at(x as f32, y as f32, w as f32, h as f32, thickness as f32).is_some()
                && fb.pixels[(y * w + x) as usize] >> 24 == 0
            {
                put_pixel(fb, x, y, strip);
            }
        }
    }

    draw_line(fb, 0, 0, w - 1, 0, color);
    draw_line(fb, 0, h - 1, w - 1, h - 1, color);
    draw_line(fb, 0, 0, 0, h - 1, color);
    draw_line(fb, w - 1, 0, w - 1, h - 1, color);
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a "+" shape (with a tiny gap at the center) follows your mouse.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (just enough for "X: -12, Y: 340 | W: 300 H: 100") ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, c) in [(1, 0xFF00_0000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + offset, y + ry as i32 + offset, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (6 px advance).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
