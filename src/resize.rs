//! Edge / corner resize handles
//!
//! Idle --(press on a handle)--> Dragging --(release)--> Idle
//!
//! Every move rebuilds the bounds from the snapshot taken at press time,
//! never from the live bounds, so rounding and clamping can't accumulate.

use crate::types::{Vec2, WindowBounds};
#[cfg(test)]
use std::str::FromStr;

pub const MIN_WIDTH: i32 = 150;
pub const MIN_HEIGHT: i32 = 50;

/// Which handle is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeDirection {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeDirection {
    #[inline]
    pub fn has_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    #[inline]
    pub fn has_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    #[inline]
    pub fn has_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    #[inline]
    pub fn has_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    /// Handle tag, e.g. `"bottom-right"`
    pub fn tag(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

#[cfg(test)]
impl FromStr for ResizeDirection {
    type Err = String;

    /// Accepts `top`, `bottom-right`, `right-bottom`, `bottomright` and the
    /// short compass forms `n`, `se`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let (mut top, mut bottom, mut left, mut right) = (false, false, false, false);
        match tag.as_str() {
            "n" => top = true,
            "s" => bottom = true,
            "w" => left = true,
            "e" => right = true,
            "ne" => (top, right) = (true, true),
            "nw" => (top, left) = (true, true),
            "se" => (bottom, right) = (true, true),
            "sw" => (bottom, left) = (true, true),
            _ => {
                top = tag.contains("top");
                bottom = tag.contains("bottom");
                left = tag.contains("left");
                right = tag.contains("right");
            }
        }
        match (top, bottom, left, right) {
            (true, false, false, false) => Ok(Self::Top),
            (false, true, false, false) => Ok(Self::Bottom),
            (false, false, true, false) => Ok(Self::Left),
            (false, false, false, true) => Ok(Self::Right),
            (true, false, true, false) => Ok(Self::TopLeft),
            (true, false, false, true) => Ok(Self::TopRight),
            (false, true, true, false) => Ok(Self::BottomLeft),
            (false, true, false, true) => Ok(Self::BottomRight),
            _ => Err(format!("not a resize handle: {s:?}")),
        }
    }
}

/// New bounds for a drag of `delta` (screen px) on `direction`, starting
/// from `start`. Each edge is handled on its own; corners just combine two.
/// Results are clamped to the minimum size, never rejected.
pub fn resize_bounds(direction: ResizeDirection, start: WindowBounds, delta: Vec2) -> WindowBounds {
    let dx = delta.x.round() as i32;
    let dy = delta.y.round() as i32;
    let mut out = start;

    if direction.has_right() {
        out.width = start.width.saturating_add(dx).max(MIN_WIDTH);
    }
    if direction.has_left() {
        let width = start.width.saturating_sub(dx).max(MIN_WIDTH);
        out.width = width;
        out.x = start.x.saturating_add(start.width.saturating_sub(width)); // right edge stays put
    }
    if direction.has_bottom() {
        out.height = start.height.saturating_add(dy).max(MIN_HEIGHT);
    }
    if direction.has_top() {
        let height = start.height.saturating_sub(dy).max(MIN_HEIGHT);
        out.height = height;
        out.y = start.y.saturating_add(start.height.saturating_sub(height)); // bottom edge stays put
    }

    out
}

/// Whatever owns the window geometry (the window manager, or a fake in tests).
pub trait Geometry {
    fn bounds(&self) -> WindowBounds;
    fn set_bounds(&mut self, bounds: WindowBounds);
}

/// Live drag, created on press and dropped on release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub direction: ResizeDirection,
    pub start_pointer: Vec2,
    pub start_bounds: WindowBounds,
}

#[derive(Debug, Default)]
pub struct ResizeController {
    session: Option<DragSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Press on a handle: snapshot pointer and bounds.
    pub fn pointer_down(&mut self, direction: ResizeDirection, pointer: Vec2, geometry: &impl Geometry) {
        let start_bounds = geometry.bounds();
        log::debug!("resize start: {} from {:?}", direction.tag(), start_bounds);
        self.session = Some(DragSession { direction, start_pointer: pointer, start_bounds });
    }

    /// Pointer moved (screen coordinates). Writes and returns the new bounds
    /// while dragging; does nothing otherwise.
    pub fn pointer_move(&mut self, pointer: Vec2, geometry: &mut impl Geometry) -> Option<WindowBounds> {
        let session = self.session?;
        let bounds = resize_bounds(session.direction, session.start_bounds, pointer - session.start_pointer);
        geometry.set_bounds(bounds);
        Some(bounds)
    }

    /// Release. A stray release with no press is a no-op.
    pub fn pointer_up(&mut self) -> Option<DragSession> {
        let ended = self.session.take();
        if let Some(session) = &ended {
            log::debug!("resize end: {}", session.direction.tag());
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeWindow {
        bounds: WindowBounds,
        writes: usize,
    }

    impl FakeWindow {
        fn new(bounds: WindowBounds) -> Self {
            Self { bounds, writes: 0 }
        }
    }

    impl Geometry for FakeWindow {
        fn bounds(&self) -> WindowBounds {
            self.bounds
        }
        fn set_bounds(&mut self, bounds: WindowBounds) {
            self.bounds = bounds;
            self.writes += 1;
        }
    }

    #[test]
    fn test_resize_right() {
        let b = resize_bounds(ResizeDirection::Right, WindowBounds::new(10, 20, 300, 100), Vec2::new(40.0, 99.0));
        assert_eq!(b, WindowBounds::new(10, 20, 340, 100));
    }

    #[test]
    fn test_resize_left_keeps_right_edge() {
        let start = WindowBounds::new(100, 50, 300, 100);
        let b = resize_bounds(ResizeDirection::Left, start, Vec2::new(-50.0, 0.0));
        assert_eq!(b, WindowBounds::new(50, 50, 350, 100));
        assert_eq!(b.x + b.width, start.x + start.width);
    }

    #[test]
    fn test_resize_left_clamps_to_min_width() {
        let start = WindowBounds::new(100, 50, 300, 100);
        for dx in [151.0, 200.0, 1000.0, 1.0e5] {
            let b = resize_bounds(ResizeDirection::Left, start, Vec2::new(dx, 0.0));
            assert_eq!(b.width, MIN_WIDTH);
            assert_eq!(b.x, start.x + (start.width - MIN_WIDTH));
        }
    }

    #[test]
    fn test_resize_bottom_min_height_is_50() {
        let b = resize_bounds(ResizeDirection::Bottom, WindowBounds::new(0, 0, 300, 100), Vec2::new(0.0, -90.0));
        assert_eq!(b.height, MIN_HEIGHT);
        assert_eq!(b.y, 0);
    }

    #[test]
    fn test_resize_top_past_minimum() {
        let b = resize_bounds(ResizeDirection::Top, WindowBounds::new(0, 0, 200, 200), Vec2::new(0.0, 300.0));
        assert_eq!(b.height, 50);
        assert_eq!(b.y, 150);
        assert_eq!(b.x, 0);
        assert_eq!(b.width, 200);
    }

    #[test]
    fn test_bottom_right_never_moves_origin() {
        let start = WindowBounds::new(40, 60, 300, 100);
        for (dx, dy) in [(25.0, 35.0), (-500.0, 12.0), (7.0, -400.0)] {
            let b = resize_bounds(ResizeDirection::BottomRight, start, Vec2::new(dx, dy));
            assert_eq!((b.x, b.y), (40, 60));
            assert_eq!(b.width, (300 + dx as i32).max(MIN_WIDTH));
            assert_eq!(b.height, (100 + dy as i32).max(MIN_HEIGHT));
        }
    }

    #[test]
    fn test_top_left_moves_both_anchors() {
        let start = WindowBounds::new(100, 100, 300, 200);
        let b = resize_bounds(ResizeDirection::TopLeft, start, Vec2::new(20.0, -30.0));
        assert_eq!(b, WindowBounds::new(120, 70, 280, 230));
    }

    #[test]
    fn test_single_edge_drags_keep_opposite_edge() {
        let start = WindowBounds::new(5, 5, 400, 300);
        let delta = Vec2::new(-37.0, 61.0);
        for dir in [ResizeDirection::Top, ResizeDirection::Bottom, ResizeDirection::Left, ResizeDirection::Right] {
            let b = resize_bounds(dir, start, delta);
            if dir.has_left() {
                assert_eq!(b.x + b.width, start.x + start.width);
            }
            if dir.has_right() {
                assert_eq!(b.x, start.x);
            }
            if dir.has_top() {
                assert_eq!(b.y + b.height, start.y + start.height);
            }
            if dir.has_bottom() {
                assert_eq!(b.y, start.y);
            }
        }
    }

    #[test]
    fn test_extreme_deltas_saturate_instead_of_overflowing() {
        use ResizeDirection::*;
        let start = WindowBounds::new(0, 0, 300, 100);
        for dir in [Top, Bottom, Left, Right, TopLeft, TopRight, BottomLeft, BottomRight] {
            for delta in [Vec2::new(3.0e9, 3.0e9), Vec2::new(-3.0e9, -3.0e9), Vec2::new(3.0e9, -3.0e9)] {
                let b = resize_bounds(dir, start, delta);
                assert!(b.width >= MIN_WIDTH && b.height >= MIN_HEIGHT, "{dir:?} {delta:?} -> {b:?}");
            }
        }

        let grown = resize_bounds(Right, start, Vec2::new(3.0e9, 0.0));
        assert_eq!(grown.width, i32::MAX);
        let shrunk = resize_bounds(Left, start, Vec2::new(3.0e9, 0.0));
        assert_eq!(shrunk, WindowBounds::new(150, 0, MIN_WIDTH, 100));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("top".parse::<ResizeDirection>(), Ok(ResizeDirection::Top));
        assert_eq!("bottom-right".parse::<ResizeDirection>(), Ok(ResizeDirection::BottomRight));
        assert_eq!("left-top".parse::<ResizeDirection>(), Ok(ResizeDirection::TopLeft));
        assert_eq!("SW".parse::<ResizeDirection>(), Ok(ResizeDirection::BottomLeft));
        assert!("top-bottom".parse::<ResizeDirection>().is_err());
        assert!("middle".parse::<ResizeDirection>().is_err());
        use ResizeDirection::*;
        for dir in [Top, Bottom, Left, Right, TopLeft, TopRight, BottomLeft, BottomRight] {
            assert_eq!(dir.tag().parse::<ResizeDirection>(), Ok(dir));
        }
    }

    #[test]
    fn test_drag_uses_start_bounds_not_live() {
        let mut win = FakeWindow::new(WindowBounds::new(0, 0, 300, 100));
        let mut ctl = ResizeController::new();
        ctl.pointer_down(ResizeDirection::Right, Vec2::new(300.0, 50.0), &win);

        ctl.pointer_move(Vec2::new(320.0, 50.0), &mut win);
        assert_eq!(win.bounds.width, 320);
        ctl.pointer_move(Vec2::new(330.0, 50.0), &mut win);
        assert_eq!(win.bounds.width, 330); // not 350
        assert_eq!(win.writes, 2);
    }

    #[test]
    fn test_release_ends_session() {
        let mut win = FakeWindow::new(WindowBounds::new(0, 0, 300, 100));
        let mut ctl = ResizeController::new();
        ctl.pointer_down(ResizeDirection::Bottom, Vec2::new(150.0, 100.0), &win);
        assert!(ctl.is_dragging());
        assert!(ctl.pointer_up().is_some());

        assert_eq!(ctl.pointer_move(Vec2::new(0.0, 900.0), &mut win), None);
        assert_eq!(win.writes, 0);
    }

    #[test]
    fn test_stray_release_is_noop() {
        let mut ctl = ResizeController::new();
        assert!(ctl.pointer_up().is_none());
        assert!(!ctl.is_dragging());
    }
}
