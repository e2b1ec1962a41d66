//! Finger counter.
//!
//! Counts hands and fingers, smooths both over a short history so a
//! flickering finger does not make the display jump, and lights up the
//! panels of a static diagram that explain what each finger count does.

use leap_frame::SmoothingBuffer;

use super::{Scene, Stage};
use crate::canvas::{Align, Rgba};

const LIT:    Rgba = Rgba::hex(0xAAFFAA);
const UNLIT:  Rgba = Rgba::hex(0xEEEEEE);
const IDLE:   Rgba = Rgba::hex(0xCCCCCC);
const INK:    Rgba = Rgba::hex(0x555555);

/// The eight panels of the finger-count diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagramPanel {
    Finger1,
    Finger2,
    Finger3,
    Touch,
    Scroll,
    ClickScroll,
    ZoomRotate,
    Draw,
}

impl DiagramPanel {
    pub const ALL: [DiagramPanel; 8] = [
        DiagramPanel::Finger1,
        DiagramPanel::Finger2,
        DiagramPanel::Finger3,
        DiagramPanel::Touch,
        DiagramPanel::Scroll,
        DiagramPanel::ClickScroll,
        DiagramPanel::ZoomRotate,
        DiagramPanel::Draw,
    ];

    /// Element id on the tutorial page.
    pub fn id(self) -> &'static str {
        match self {
            DiagramPanel::Finger1     => "finger1",
            DiagramPanel::Finger2     => "finger2",
            DiagramPanel::Finger3     => "finger3",
            DiagramPanel::Touch       => "touch",
            DiagramPanel::Scroll      => "scroll",
            DiagramPanel::ClickScroll => "clickScroll",
            DiagramPanel::ZoomRotate  => "zoomRotate",
            DiagramPanel::Draw        => "draw",
        }
    }

    fn caption(self) -> &'static str {
        match self {
            DiagramPanel::Finger1     => "1 finger",
            DiagramPanel::Finger2     => "2 fingers",
            DiagramPanel::Finger3     => "3+ fingers",
            DiagramPanel::Touch       => "touch",
            DiagramPanel::Scroll      => "scroll",
            DiagramPanel::ClickScroll => "click scroll",
            DiagramPanel::ZoomRotate  => "zoom rotate",
            DiagramPanel::Draw        => "draw",
        }
    }
}

/// Panels lit for a smoothed finger count.
pub fn panels_for(fingers: u32) -> &'static [DiagramPanel] {
    use DiagramPanel::*;
    match fingers {
        0 => &[],
        1 => &[Finger1, Touch, ClickScroll],
        2 => &[Finger2, Scroll, ZoomRotate],
        _ => &[Finger3, Scroll, Draw],
    }
}

pub struct FingerCount {
    hands:   SmoothingBuffer,
    fingers: SmoothingBuffer,
    hand_count:   u32,
    finger_count: u32,
}

impl FingerCount {
    pub fn new(history: usize) -> Self {
        FingerCount {
            hands:   SmoothingBuffer::zeroed(history),
            fingers: SmoothingBuffer::zeroed(history),
            hand_count:   0,
            finger_count: 0,
        }
    }

    pub fn hand_count(&self)   -> u32 { self.hand_count }
    pub fn finger_count(&self) -> u32 { self.finger_count }

    pub fn label(&self) -> String {
        format!("{} Fingers", self.finger_count)
    }

    pub fn highlighted(&self) -> &'static [DiagramPanel] {
        panels_for(self.finger_count)
    }

    /// Feed one frame's raw counts.
    pub fn record(&mut self, hands: usize, fingers: usize) {
        self.hands.push(hands as f64);
        self.fingers.push(fingers as f64);
        self.hand_count = self.hands.average().round() as u32;
        self.finger_count = self.fingers.average().round() as u32;
    }
}

impl Scene for FingerCount {
    fn draw(&mut self, stage: &mut Stage<'_>) {
        self.record(stage.frame.hands.len(), stage.frame.pointables.len());

        let w = stage.width();
        let h = stage.height();

        let label_color = if self.finger_count > 0 { LIT } else { IDLE };
        stage.canvas.fill_text(&self.label(), 0.0, -h * 0.82, w / 20.0, label_color, Align::Center);

        // Finger panels across the top row, gesture panels in two rows under them.
        let lit = self.highlighted();
        let cols = 3.0;
        let pad = 10.0;
        let cell_w = (w - pad * (cols + 1.0)) / cols;
        let cell_h = h * 0.18;
        let all = DiagramPanel::ALL;
        let rows: [&[DiagramPanel]; 3] = [&all[0..3], &all[3..6], &all[6..8]];
        for (r, row) in rows.iter().enumerate() {
            let top = -h * 0.68 + r as f32 * (cell_h + pad);
            for (c, panel) in row.iter().enumerate() {
                let left = -w / 2.0 + pad + c as f32 * (cell_w + pad);
                let fill = if lit.contains(panel) { LIT } else { UNLIT };
                stage.canvas.fill_rect(left, top, cell_w, cell_h, fill);
                stage.canvas.fill_text(
                    panel.caption(),
                    left + cell_w / 2.0,
                    top + cell_h / 2.0 + 6.0,
                    w / 45.0,
                    INK,
                    Align::Center,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_smoothed_over_history() {
        let mut fc = FingerCount::new(4);
        fc.record(1, 2);
        // [2, 0, 0, 0] → 0.5 rounds away from zero
        assert_eq!(fc.finger_count(), 1);
        fc.record(1, 2);
        assert_eq!(fc.finger_count(), 1);
        fc.record(1, 2);
        fc.record(1, 2);
        assert_eq!(fc.finger_count(), 2);
        assert_eq!(fc.hand_count(), 1);
    }

    #[test]
    fn brief_dropout_does_not_flicker() {
        let mut fc = FingerCount::new(21);
        for _ in 0..21 {
            fc.record(1, 3);
        }
        fc.record(0, 0);
        assert_eq!(fc.finger_count(), 3);
    }

    #[test]
    fn panels_by_count() {
        assert!(panels_for(0).is_empty());
        assert!(panels_for(1).contains(&DiagramPanel::ClickScroll));
        assert!(panels_for(2).contains(&DiagramPanel::ZoomRotate));
        assert!(panels_for(5).contains(&DiagramPanel::Draw));
        assert!(panels_for(5).contains(&DiagramPanel::Finger3));
    }

    #[test]
    fn label_text() {
        let mut fc = FingerCount::new(1);
        fc.record(1, 4);
        assert_eq!(fc.label(), "4 Fingers");
        assert_eq!(fc.highlighted()[0].id(), "finger3");
    }
}
