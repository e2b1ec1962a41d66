//! Fingertip pointer drawing.
//!
//! A pointer is a circle whose look tells the user how far they are from
//! the touch plane: a small glowing green dot when touching, a white ring
//! that shrinks as the finger approaches when hovering.

use leap_frame::{map_to_canvas, InteractionBox, Pointable};

use crate::canvas::{Canvas, Rgba};

pub const TOUCH_RADIUS:     f32 = 10.0;
pub const HOVER_MIN_RADIUS: f32 = 4.0;
pub const HOVER_GAIN:       f32 = 50.0;
pub const MAX_RADIUS:       f32 = 20.0;
const GLOW_BLUR:            f32 = 50.0;

/// Circle radius for a pointer `touch_distance` away from the plane.
pub fn finger_radius(touch_distance: f32, size: f32) -> f32 {
    if touch_distance <= 0.0 {
        TOUCH_RADIUS * size
    } else {
        (HOVER_MIN_RADIUS + touch_distance * HOVER_GAIN * size).min(MAX_RADIUS * size)
    }
}

/// Fill, outline and optional glow for one pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FingerStyle {
    pub radius:     f32,
    pub fill:       Rgba,
    pub stroke:     Rgba,
    pub line_width: f32,
    pub glow:       Option<Rgba>,
}

impl FingerStyle {
    pub fn for_distance(touch_distance: f32, size: f32) -> Self {
        let radius = finger_radius(touch_distance, size);
        if touch_distance <= 0.0 {
            FingerStyle {
                radius,
                fill:       Rgba::new(0, 200, 0, 0.4),
                stroke:     Rgba::WHITE,
                line_width: 4.0 * size,
                glow:       Some(Rgba::hex(0x00AA00)),
            }
        } else {
            FingerStyle {
                radius,
                fill:       Rgba::new(255, 255, 255, 0.3),
                stroke:     Rgba::hex(0x777777),
                line_width: 8.0 * size,
                glow:       None,
            }
        }
    }
}

/// Keep a scene position (`y` measured up from the floor) on the canvas.
pub fn clamp_to_canvas(pos: (f32, f32), width: f32, height: f32) -> (f32, f32) {
    let (mut x, mut y) = pos;
    if x <= -width / 2.0 { x = -width / 2.0; }
    if x >= width / 2.0  { x = width / 2.0; }
    if y >= height       { y = height; }
    if y <= 0.0          { y = 0.0; }
    (x, y)
}

/// Draw `pointable` at `pos`, or at its stabilized tip mapped through
/// `ibox` when no position is given.  `size` scales every dimension.
pub fn draw_finger(
    canvas:    &mut Canvas,
    pointable: &Pointable,
    pos:       Option<(f32, f32)>,
    size:      f32,
    ibox:      &InteractionBox,
) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let position = pos.unwrap_or_else(|| map_to_canvas(pointable.stabilized_tip_position, ibox, w, h));
    let (x, y) = clamp_to_canvas(position, w, h);

    let style = FingerStyle::for_distance(pointable.touch_distance, size);
    if let Some(glow) = style.glow {
        canvas.glow(x, -y, style.radius, GLOW_BLUR, glow);
    }
    canvas.fill_circle(x, -y, style.radius, style.fill);
    canvas.stroke_circle(x, -y, style.radius, style.line_width, style.stroke);
}
