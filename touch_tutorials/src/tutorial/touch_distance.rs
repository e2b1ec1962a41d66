//! Touch-distance gauge.
//!
//! The canvas is split into a grey hover half and a green touch half.  A
//! bar grows from the centre line toward whichever half the first finger's
//! touch distance points to, and an enlarged pointer sits above it.

use leap_frame::TouchZone;

use super::{Scene, Stage};
use crate::canvas::{Align, Rgba};

const FONT_SIZE: f32 = 30.0;

pub struct TouchDistance {
    finger_size: f32,
    /// Bar end relative to the centre line; negative = hovering side.
    boundary: Option<f32>,
    zone:     Option<TouchZone>,
}

impl TouchDistance {
    pub fn new(finger_size: f32) -> Self {
        TouchDistance { finger_size, boundary: None, zone: None }
    }

    pub fn boundary(&self) -> Option<f32>     { self.boundary }
    pub fn zone(&self)     -> Option<TouchZone> { self.zone }
}

impl Scene for TouchDistance {
    fn draw(&mut self, stage: &mut Stage<'_>) {
        let w = stage.width();
        let h = stage.height();
        let frame = stage.frame;

        stage.canvas.fill_rect(-w / 2.0, -h / 2.0, w / 2.0, h / 4.0, Rgba::hex(0xCCCCCC));
        stage.canvas.fill_rect(0.0, -h / 2.0, w / 2.0, h / 4.0, Rgba::hex(0xAAFFAA));

        let Some(pointable) = frame.first_pointable() else {
            self.boundary = None;
            self.zone = None;
            return;
        };

        let distance = -pointable.touch_distance * w / 2.0;
        let label_y = -h / 2.0 - h / 5.0 - FONT_SIZE * self.finger_size;

        if distance <= 0.0 {
            stage.canvas.fill_rect(distance, -h / 2.0, -distance, h / 4.0, Rgba::hex(0x777777));
            stage.canvas.fill_text("hover", 0.0, label_y, FONT_SIZE, Rgba::hex(0xAAAAAA), Align::Center);
            self.zone = Some(TouchZone::Hovering);
        } else {
            stage.canvas.fill_rect(distance, -h / 2.0, -distance, h / 4.0, Rgba::hex(0x33AA33));
            stage.canvas.fill_text("touch", 0.0, label_y, FONT_SIZE, Rgba::new(0, 200, 0, 0.4), Align::Center);
            self.zone = Some(TouchZone::Touching);
        }
        self.boundary = Some(distance);

        stage.draw_finger(pointable, Some((0.0, h / 2.0 + h / 5.0)), self.finger_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use leap_frame::{FrameSnapshot, Pointable, Vec3};

    fn run(scene: &mut TouchDistance, touch_distance: Option<f32>) -> Canvas {
        let mut canvas = Canvas::new(300, 200);
        let mut frame = FrameSnapshot::default();
        if let Some(d) = touch_distance {
            frame.pointables.push(Pointable::at(1, Vec3::zero(), d));
        }
        let mut events = Vec::new();
        let mut stage = Stage::new(&mut canvas, &frame, &frame, "touchDistance", &mut events);
        scene.draw(&mut stage);
        canvas
    }

    #[test]
    fn hovering_bar_extends_left() {
        let mut s = TouchDistance::new(2.0);
        let c = run(&mut s, Some(0.5));
        assert_eq!(s.boundary(), Some(-75.0));
        assert_eq!(s.zone(), Some(TouchZone::Hovering));
        // Inside the dark bar on the hover side.
        assert_eq!(c.pixel_at(-40.0, -90.0), Some(0xFF777777));
    }

    #[test]
    fn touching_bar_extends_right() {
        let mut s = TouchDistance::new(2.0);
        let c = run(&mut s, Some(-0.4));
        assert_eq!(s.boundary(), Some(60.0));
        assert_eq!(s.zone(), Some(TouchZone::Touching));
        assert_eq!(c.pixel_at(30.0, -90.0), Some(0xFF33AA33));
    }

    #[test]
    fn zones_drawn_without_finger() {
        let mut s = TouchDistance::new(2.0);
        let c = run(&mut s, None);
        assert_eq!(s.boundary(), None);
        assert_eq!(c.pixel_at(-100.0, -90.0), Some(0xFFCCCCCC));
        assert_eq!(c.pixel_at(100.0, -90.0), Some(0xFFAAFFAA));
    }
}
