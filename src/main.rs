// What you SEE:
// • A small borderless face floating above every other window.
// • The head turns toward your mouse pointer wherever it is on screen.
// • Every few seconds the eyes blink and the mouth "talks".
// • Drag any edge or corner to resize. B toggles the debug outline.
// • ESC (or Q) quits.

mod compose;
mod config;
mod cursor;
mod draw;
mod error;
mod idle;
mod resize;
mod rig;
mod sprites;
mod tracking;
mod types;

use compose::compose;
use config::OverlayConfig;
use cursor::CursorFeed;
use draw::{draw_crosshair, draw_outline, draw_text_5x7, Drawer};
use error::Error;
use resize::{Geometry, ResizeController, MIN_HEIGHT, MIN_WIDTH};
use rig::FaceRig;
use sprites::LayerSprites;
use std::time::{Duration, Instant};
use types::{CursorSample, FrameBuffer, WindowBounds};

const OUTLINE_COLOR: u32 = 0xFF_FF_4D_6D;
const HUD_COLOR: u32 = 0xFF_FF_FF_FF;
const CROSSHAIR_COLOR: u32 = 0xFF_FF_CC_33;

fn load_config() -> Result<OverlayConfig, Error> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("config: {path}");
            OverlayConfig::load_from_file(path)?
        }
        None => OverlayConfig::load_or_default()?,
    };
    config.merge_with_env();
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Config: read once, never reloaded --- */
    let config = load_config()?;
    let thickness = config.window.handle_thickness;

    /* --- Layers + the rig that moves them ---
       Visual: nothing on screen yet; a broken image just leaves its layer empty. */
    let sprites = LayerSprites::load(&config.assets);
    let mut rig = FaceRig::new(&config, sprites.layer_set(), Instant::now())?;

    /* --- Overlay window ---
       Visual: the face window appears (300x100 by default), above everything. */
    let start = WindowBounds::new(
        config.window.x.unwrap_or(100),
        config.window.y.unwrap_or(100),
        config.window.width.max(MIN_WIDTH),
        config.window.height.max(MIN_HEIGHT),
    );
    let mut drawer = Drawer::new("face-follow", start, config.window.target_fps)?;
    log::info!(
        "overlay at {},{} {}x{} (face policy: {:?})",
        start.x, start.y, start.width, start.height, config.face_policy
    );

    let mut screen = FrameBuffer::new(start.width as usize, start.height as usize);
    let mut feed = CursorFeed::new(Duration::from_millis(config.window.cursor_interval_ms));
    let mut resize = ResizeController::new();
    let mut show_outline = config.window.debug_outline;
    let mut last_sample: Option<CursorSample> = None;
    let mut was_down = false;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        let now = Instant::now();

        /* 1) Debug toggle. Shares nothing with tracking / drag state. */
        if drawer.b_pressed_once() { show_outline = !show_outline; }

        /* 2) Resize handles: press on a strip starts a drag, moves apply at
              once, release ends it and rebuilds the surface if the size changed. */
        let down = drawer.left_mouse_down();
        let pressed = down && !was_down;
        was_down = down;

        if pressed {
            if let (Some(dir), Some(p)) = (drawer.handle_under_mouse(thickness), drawer.screen_cursor()) {
                resize.pointer_down(dir, p.as_vec2(), &drawer);
            }
        } else if down && resize.is_dragging() {
            if let Some(p) = drawer.screen_cursor() {
                resize.pointer_move(p.as_vec2(), &mut drawer);
            }
        } else if resize.pointer_up().is_some() {
            drawer.rebuild_if_resized()?;
        }

        /* 3) Cursor feed -> tracker. Latest sample only; rotation always lands,
              translations skip layers that are mid-blink / mid-talk. */
        feed.tick(now, || drawer.screen_cursor());
        if let Some(sample) = feed.take() {
            rig.apply_sample(sample, &drawer.bounds());
            last_sample = Some(sample);
        }

        /* 4) Idle animations. */
        for (kind, phase) in rig.tick(now) {
            log::trace!("{kind} now {phase:?}");
        }

        /* 5) Draw the layers at the current bounds. */
        let bounds = drawer.bounds();
        screen.resize(bounds.width as usize, bounds.height as usize);
        compose(&mut screen, &rig, &sprites);

        if show_outline {
            draw_outline(&mut screen, thickness, OUTLINE_COLOR);
            if let Some(s) = last_sample {
                let hud = format!("X: {}, Y: {}", s.x.round() as i32, s.y.round() as i32);
                draw_text_5x7(&mut screen, thickness + 2, thickness + 2, &hud, HUD_COLOR);
            }
            let size = format!("W: {} H: {}", bounds.width, bounds.height);
            draw_text_5x7(&mut screen, thickness + 2, thickness + 12, &size, HUD_COLOR);
            if let Some((mx, my)) = drawer.local_mouse() {
                draw_crosshair(&mut screen, mx as i32, my as i32, 8, CROSSHAIR_COLOR);
            }
        }

        /* 6) Present. */
        drawer.present(&screen)?;

        /* 7) FPS once per second (RUST_LOG=debug) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            log::debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    /* Teardown: timers go first, the window after. */
    rig.shutdown();
    debug_assert!(rig.is_shut_down());
    drop(drawer);
    log::info!("overlay closed");
    Ok(())
}
