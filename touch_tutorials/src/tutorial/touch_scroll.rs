//! Touch scrolling.
//!
//! A grid that scrolls while any finger touches: hand motion between frames
//! feeds a velocity, the velocity moves the grid offset, and momentum bleeds
//! the velocity off a little every frame so a flick coasts to a stop.

use leap_frame::Vec3;
use tracing::trace;

use super::{Scene, Stage};
use crate::canvas::Rgba;

const GRID_COLOR: Rgba = Rgba::hex(0x999999);
const LINE_WIDTH: f32 = 4.0;
/// Hand translation (mm) is divided by this before it becomes speed.
const TRANSLATION_DIVISOR: f32 = 10.0;

pub struct TouchScroll {
    offset:   [f32; 2],
    speed:    [f32; 2],
    cell:     [f32; 2],
    momentum: f32,
    scroll_x: bool,
    scroll_y: bool,
}

impl TouchScroll {
    pub fn new(cell_size: f32, momentum: f32, scroll_x: bool, scroll_y: bool) -> Self {
        TouchScroll {
            offset: [0.0, 0.0],
            speed:  [0.0, 0.0],
            cell:   [cell_size, cell_size],
            momentum,
            scroll_x,
            scroll_y,
        }
    }

    pub fn offset(&self) -> [f32; 2] { self.offset }
    pub fn speed(&self)  -> [f32; 2] { self.speed }

    /// One frame of scroll physics.
    pub fn advance(&mut self, touching: bool, translation: Vec3) {
        if touching {
            if self.scroll_x {
                self.speed[0] += translation.x / TRANSLATION_DIVISOR;
            }
            if self.scroll_y {
                self.speed[1] += translation.y / TRANSLATION_DIVISOR;
            }
        }
        for axis in 0..2 {
            self.offset[axis] = (self.offset[axis] + self.speed[axis]).rem_euclid(self.cell[axis]);
            self.speed[axis] *= self.momentum;
        }
    }

    fn draw_grid(&self, stage: &mut Stage<'_>) {
        let w = stage.width();
        let h = stage.height();
        let bars_x = (w / self.cell[0]) as usize + 1;
        let bars_y = (h / self.cell[1]) as usize + 1;

        for i in 0..=bars_x {
            let x = -w / 2.0 + i as f32 * self.cell[0] + self.offset[0];
            stage.canvas.fill_rect(x, 0.0, LINE_WIDTH, -h, GRID_COLOR);
        }
        for i in 0..=bars_y {
            let y = -(i as f32 * self.cell[1]) - self.offset[1];
            stage.canvas.fill_rect(-w / 2.0, y, w, LINE_WIDTH, GRID_COLOR);
        }
    }
}

impl Scene for TouchScroll {
    fn draw(&mut self, stage: &mut Stage<'_>) {
        self.draw_grid(stage);

        let frame = stage.frame;
        for p in &frame.pointables {
            stage.draw_finger(p, None, 1.0);
        }

        let touching = frame.is_touching();
        let translation = frame.translation(stage.previous);
        self.advance(touching, translation);
        trace!(offset = ?self.offset, speed = ?self.speed, touching, "scroll step");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_grid_stays_put() {
        let mut s = TouchScroll::new(100.0, 0.98, true, true);
        s.advance(false, Vec3::new(50.0, 50.0, 0.0));
        assert_eq!(s.offset(), [0.0, 0.0]);
        assert_eq!(s.speed(), [0.0, 0.0]);
    }

    #[test]
    fn touching_translation_adds_speed() {
        let mut s = TouchScroll::new(100.0, 0.5, true, true);
        s.advance(true, Vec3::new(30.0, -20.0, 0.0));
        // speed 3, -2 moved the offset, then momentum halved the speed
        assert!((s.offset()[0] - 3.0).abs() < 1e-5);
        assert!((s.offset()[1] - 98.0).abs() < 1e-5);
        assert_eq!(s.speed(), [1.5, -1.0]);
    }

    #[test]
    fn offset_wraps_both_ways() {
        let mut s = TouchScroll::new(100.0, 1.0, true, true);
        s.advance(true, Vec3::new(1050.0, -1050.0, 0.0));
        assert!((s.offset()[0] - 5.0).abs() < 1e-3);
        assert!((s.offset()[1] - 95.0).abs() < 1e-3);
        for _ in 0..50 {
            s.advance(false, Vec3::zero());
            assert!(s.offset()[0] >= 0.0 && s.offset()[0] < 100.0);
            assert!(s.offset()[1] >= 0.0 && s.offset()[1] < 100.0);
        }
    }

    #[test]
    fn momentum_decays_without_oscillation() {
        let mut s = TouchScroll::new(100.0, 0.98, true, true);
        s.advance(true, Vec3::new(40.0, 0.0, 0.0));
        let mut last = s.speed()[0];
        for _ in 0..500 {
            s.advance(false, Vec3::zero());
            let now = s.speed()[0];
            assert!(now > 0.0 && now < last);
            assert!((now - last * 0.98).abs() < 1e-5);
            last = now;
        }
        assert!(last < 0.01);
    }

    #[test]
    fn disabled_axis_ignores_motion() {
        let mut s = TouchScroll::new(100.0, 0.98, true, false);
        s.advance(true, Vec3::new(10.0, 10.0, 0.0));
        assert_eq!(s.speed()[1], 0.0);
        assert!(s.speed()[0] > 0.0);
    }
}
