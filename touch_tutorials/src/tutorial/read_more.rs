//! "Read more" link panel: two full-width buttons, touch one to follow it.

use leap_frame::TouchZone;

use super::{Scene, Stage};
use crate::button::{Button, ButtonSet};
use crate::canvas::{Align, Rgba};

const BASIC:    usize = 0;
const ADVANCED: usize = 1;

struct Link {
    title:    &'static str,
    subtitle: &'static str,
    target:   String,
}

pub struct ReadMore {
    width:   f32,
    buttons: ButtonSet,
    links:   [Link; 2],
    /// Where the pointer was last frame; starts far off-canvas.
    finger_position: (f32, f32),
}

impl ReadMore {
    pub fn new(width: f32, height: f32, basic_link: &str, advanced_link: &str) -> Self {
        let bh = height / 4.0;
        let bw = width - 20.0;
        let y1 = -height + bh + 10.0;
        let y2 = y1 + bh + 10.0;

        let mut buttons = ButtonSet::new();
        buttons.push(Button::new((0.0, y1), bw, bh));
        buttons.push(Button::new((0.0, y2), bw, bh));

        ReadMore {
            width,
            buttons,
            links: [
                Link {
                    title:    "Touch and Scroll",
                    subtitle: "Enables a user to touch and click with Leap Motion",
                    target:   basic_link.to_string(),
                },
                Link {
                    title:    "Full Touch Simulation",
                    subtitle: "Maps all 10 fingers to direct touch points on the screen",
                    target:   advanced_link.to_string(),
                },
            ],
            finger_position: (9999.0, 0.0),
        }
    }

    pub fn buttons(&self) -> &ButtonSet { &self.buttons }

    fn draw_captions(&self, stage: &mut Stage<'_>) {
        let current = self.buttons.current();
        for (i, link) in self.links.iter().enumerate() {
            let Some(b) = self.buttons.get(i) else { continue };
            let color = if current == Some(i) { Rgba::hex(0xEEEEEE) } else { Rgba::hex(0x777777) };
            let (x, y) = b.position;
            stage.canvas.fill_text(link.title, x, y, self.width / 20.0, color, Align::Center);
            stage.canvas.fill_text(link.subtitle, x, y + self.width / 30.0, self.width / 40.0, color, Align::Center);
        }
    }
}

impl Scene for ReadMore {
    fn draw(&mut self, stage: &mut Stage<'_>) {
        self.buttons.check_and_draw_all(self.finger_position, stage.canvas);
        self.draw_captions(stage);

        let frame = stage.frame;
        let previous = stage.previous;
        let (Some(p), Some(op)) = (frame.first_pointable(), previous.first_pointable()) else {
            return;
        };

        stage.draw_finger(p, None, 1.0);

        let touched = p.touch_zone == TouchZone::Touching && op.touch_zone == TouchZone::Hovering;
        if touched {
            match self.buttons.current() {
                Some(BASIC)    => stage.navigate(&self.links[BASIC].target),
                Some(ADVANCED) => stage.navigate(&self.links[ADVANCED].target),
                _ => {}
            }
        }

        self.finger_position = stage.leap_to_scene(p.stabilized_tip_position);
    }
}
