//! Touch speed trainer.
//!
//! A nested grid of buttons to tap.  The fingertip's forward velocity is
//! kept in a short history; when the finger crosses from hovering into
//! touching over a button, the averaged speed grades the tap.  Slow, small
//! taps flash the button green, jabs flash it red, and the bar at the
//! bottom shows how fast the last tap was.

use leap_frame::{GestureKind, SmoothingBuffer, TouchZone};
use tracing::debug;

use super::{Scene, Stage};
use crate::button::{Button, ButtonSet};
use crate::canvas::{Align, Rgba};

pub const GOOD_FLASH: Rgba = Rgba::new(80, 200, 80, 1.0);
pub const BAD_FLASH:  Rgba = Rgba::new(200, 80, 80, 1.0);

const GOOD_BORDER:    Rgba = Rgba::hex(0xAAFFAA);
const BAD_BORDER:     Rgba = Rgba::hex(0xFFAAAA);
const TOUCH_BAR_OFFSET: f32 = 20.0;
const BAR_SPACING:      f32 = 8.0;

pub struct TouchSpeed {
    width:  f32,
    height: f32,

    buttons:            ButtonSet,
    currently_touching: bool,
    finger_pos:         (f32, f32),

    tip_speeds:      SmoothingBuffer,
    touch_speed:     Option<f64>,
    speed_reduction: f32,
    good_threshold:  f32,

    bar_height:       f32,
    touch_bar_height: f32,
    touch_bar_top:    f32,
}

impl TouchSpeed {
    pub fn new(width: f32, height: f32, history: usize, speed_reduction: f32, good_threshold: f32) -> Self {
        let bar_height = height / 4.0 - BAR_SPACING;
        let mut ts = TouchSpeed {
            width,
            height,
            buttons: ButtonSet::new(),
            currently_touching: false,
            finger_pos: (0.0, 0.0),
            tip_speeds: SmoothingBuffer::zeroed(history),
            touch_speed: None,
            speed_reduction,
            good_threshold,
            bar_height,
            touch_bar_height: bar_height - TOUCH_BAR_OFFSET * 2.0,
            touch_bar_top: 0.0,
        };
        ts.layout_buttons();
        ts
    }

    /// Two wide buttons, each split into two, each of those split again.
    fn layout_buttons(&mut self) {
        let height = self.bar_height;
        for i in 0..2 {
            let width = self.width / 2.0 - 5.0;
            let x = i as f32 * (width + 10.0) + width / 2.0 - self.width / 2.0;
            let y = -self.height + height / 2.0;
            self.buttons.push(Button::new((x, y), width, height));

            for j in 0..2 {
                let width1 = width / 2.0 - 5.0;
                let x1 = x - 5.0 + j as f32 * (width1 + 10.0) - width1 / 2.0;
                let y1 = y + height + 10.0;
                self.buttons.push(Button::new((x1, y1), width1, height));

                for k in 0..2 {
                    let width2 = width1 / 2.0 - 5.0;
                    let x2 = x1 - 5.0 + k as f32 * (width2 + 10.0) - width2 / 2.0;
                    let y2 = y1 + height + 10.0;
                    self.buttons.push(Button::new((x2, y2), width2, height));
                    self.touch_bar_top = y2 + height + TOUCH_BAR_OFFSET;
                }
            }
        }
    }

    pub fn buttons(&self)            -> &ButtonSet   { &self.buttons }
    pub fn touch_speed(&self)        -> Option<f64>  { self.touch_speed }
    pub fn is_touching(&self)        -> bool         { self.currently_touching }
    pub fn tip_speed_average(&self)  -> f64          { self.tip_speeds.average() }

    /// Last tap's speed scaled so that `good_threshold` splits good from bad.
    pub fn speed_value(&self) -> Option<f32> {
        self.touch_speed.map(|s| s.abs() as f32 / self.speed_reduction)
    }

    pub fn is_good(&self) -> Option<bool> {
        self.speed_value().map(|v| v <= self.good_threshold)
    }

    fn speed_color(&self) -> Option<Rgba> {
        self.is_good().map(|good| if good { GOOD_FLASH } else { BAD_FLASH })
    }

    // ── Touch bar ─────────────────────────────────────────────────────────

    fn draw_touch_bar(&self, stage: &mut Stage<'_>) {
        let w = self.width;
        let top = self.touch_bar_top;
        let tbh = self.touch_bar_height;

        let info_size = TOUCH_BAR_OFFSET / 1.2;
        stage.canvas.fill_text(
            "Touch Speed - Lower is Better",
            6.0,
            top - tbh / 2.0,
            info_size,
            Rgba::hex(0x4B4B4B),
            Align::Center,
        );

        if let (Some(value), Some(color)) = (self.speed_value(), self.speed_color()) {
            stage.canvas.fill_rect(-w / 2.0 + 4.0, top + tbh / 2.0 + 8.0, value * w, -tbh + 4.0, color);
        }

        // Left half of the frame is the good zone, right half the bad one.
        let bottom = top + tbh / 2.0 + 10.0;
        let upper = bottom - tbh;
        let left = -w / 2.0 + 1.0;
        let right = w / 2.0 - 2.0;
        stage.canvas.stroke_polyline(
            &[(0.0, upper), (left, upper), (left, bottom), (0.0, bottom)],
            4.0,
            GOOD_BORDER,
        );
        stage.canvas.stroke_polyline(
            &[(0.0, bottom), (right, bottom), (right, upper), (0.0, upper)],
            4.0,
            BAD_BORDER,
        );

        if let Some(good) = self.is_good() {
            let size = tbh / 3.0;
            let y = -tbh / 2.0 + size / 2.0 - 4.0;
            if good {
                stage.canvas.fill_text("Good", -w / 4.0, y, size, Rgba::hex(0x339933), Align::Center);
            } else {
                stage.canvas.fill_text("Try Smaller Movements", w / 4.0, y, size, Rgba::hex(0x883333), Align::Center);
            }
        }
    }
}

impl Scene for TouchSpeed {
    fn draw(&mut self, stage: &mut Stage<'_>) {
        let frame = stage.frame;
        let previous = stage.previous;

        if let Some(g) = frame.gestures.first() {
            if g.kind == GestureKind::ScreenTap && self.currently_touching {
                debug!(gesture = g.id, "screen tap while already touching");
            }
        }

        if let (Some(p), Some(op)) = (frame.first_pointable(), previous.first_pointable()) {
            self.finger_pos = stage.leap_to_scene(p.stabilized_tip_position);

            let changed = p.touch_zone != op.touch_zone;
            let touching = p.touch_zone == TouchZone::Touching;

            if changed && touching {
                self.currently_touching = true;
                if self.buttons.current().is_some() {
                    // Graded on the history before this frame's sample.
                    self.touch_speed = Some(self.tip_speeds.average());
                    if let Some(color) = self.speed_color() {
                        self.buttons.click_current(color);
                    }
                    debug!(speed = ?self.touch_speed, good = ?self.is_good(), "tap graded");
                }
            } else if changed {
                self.currently_touching = false;
            }
        }

        self.tip_speeds.push_or_zero(frame.first_pointable().map(|p| p.tip_velocity.z as f64));

        self.buttons.check_and_draw_all(self.finger_pos, stage.canvas);

        self.draw_touch_bar(stage);
        if let Some(p) = frame.first_pointable() {
            stage.draw_finger(p, None, 1.0);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
