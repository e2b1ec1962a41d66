//! Device space → canvas space.

use crate::frame::{InteractionBox, Vec3};

/// Map a device position onto a `canvas_w × canvas_h` canvas.
///
/// `x` is scaled by the box width only (the canvas origin sits at its
/// bottom-centre, so device `x = 0` lands mid-canvas); `y` is measured up
/// from the bottom of the box.  Nothing is clamped.  A degenerate box
/// (zero width or height) produces non-finite coordinates; callers that
/// draw must tolerate them.
pub fn map_to_canvas(position: Vec3, ibox: &InteractionBox, canvas_w: f32, canvas_h: f32) -> (f32, f32) {
    let x = (position.x / ibox.width) * canvas_w;
    let floor = ibox.center.y - ibox.height / 2.0;
    let y = ((position.y - floor) / ibox.height) * canvas_h;
    (x, y)
}

impl InteractionBox {
    pub fn to_canvas(&self, position: Vec3, canvas_w: f32, canvas_h: f32) -> (f32, f32) {
        map_to_canvas(position, self, canvas_w, canvas_h)
    }
}
