//! Tutorial base: canvas, device lifecycle, and the per-frame draw hook.
//!
//! A [`Tutorial`] is the host half of one demo.  It owns the canvas, the
//! "plug in your device" placeholder and the connection state.  The demo
//! itself is a [`Scene`]: it gets a [`Stage`] each frame (canvas plus the
//! current and previous frame plus the shared pointer helpers) and paints
//! onto it.  Which scene a tutorial runs is chosen by [`TutorialKind`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use leap_frame::{map_to_canvas, FrameSnapshot, Pointable, Vec3};

use crate::canvas::{Align, Canvas, Rgba};
use crate::finger;

pub mod finger_count;
pub mod read_more;
pub mod touch_distance;
pub mod touch_scroll;
pub mod touch_speed;

pub use finger_count::{DiagramPanel, FingerCount};
pub use read_more::ReadMore;
pub use touch_distance::TouchDistance;
pub use touch_scroll::TouchScroll;
pub use touch_speed::TouchSpeed;

/// Canvas height as a share of the viewport height; width is 1.5× height.
pub const VIEWPORT_SHARE: f32 = 0.8;
pub const ASPECT:         f32 = 1.5;

// ════════════════════════════════════════════════════════════════════════════
// Events a tutorial can raise
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum TutorialEvent {
    /// The user touched a link; the host should open `target`.
    Navigate { tutorial: String, target: String },
}

// ════════════════════════════════════════════════════════════════════════════
// Stage — what a scene draws with
// ════════════════════════════════════════════════════════════════════════════

pub struct Stage<'a> {
    pub canvas:   &'a mut Canvas,
    pub frame:    &'a FrameSnapshot,
    pub previous: &'a FrameSnapshot,
    tutorial:     &'a str,
    events:       &'a mut Vec<TutorialEvent>,
}

impl<'a> Stage<'a> {
    pub fn new(
        canvas:   &'a mut Canvas,
        frame:    &'a FrameSnapshot,
        previous: &'a FrameSnapshot,
        tutorial: &'a str,
        events:   &'a mut Vec<TutorialEvent>,
    ) -> Self {
        Stage { canvas, frame, previous, tutorial, events }
    }

    pub fn width(&self)  -> f32 { self.canvas.width() as f32 }
    pub fn height(&self) -> f32 { self.canvas.height() as f32 }

    /// Device position → scene position through this frame's interaction box.
    pub fn leap_to_scene(&self, position: Vec3) -> (f32, f32) {
        map_to_canvas(position, &self.frame.interaction_box, self.width(), self.height())
    }

    pub fn draw_finger(&mut self, pointable: &Pointable, pos: Option<(f32, f32)>, size: f32) {
        finger::draw_finger(self.canvas, pointable, pos, size, &self.frame.interaction_box);
    }

    pub fn navigate(&mut self, target: &str) {
        info!(tutorial = self.tutorial, link = target, "navigation requested");
        self.events.push(TutorialEvent::Navigate {
            tutorial: self.tutorial.to_string(),
            target:   target.to_string(),
        });
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene — the draw capability every demo implements
// ════════════════════════════════════════════════════════════════════════════

pub trait Scene {
    /// Paint one frame.  The canvas has already been cleared.
    fn draw(&mut self, stage: &mut Stage<'_>);
}

// ════════════════════════════════════════════════════════════════════════════
// TutorialKind — which demo, with only the settings that demo uses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TutorialKind {
    TouchDistance {
        #[serde(default = "defaults::finger_size")]
        finger_size: f32,
    },
    TouchScroll {
        #[serde(default = "defaults::cell_size")]
        cell_size: f32,
        #[serde(default = "defaults::momentum")]
        momentum:  f32,
        #[serde(default = "defaults::yes")]
        scroll_x:  bool,
        #[serde(default = "defaults::yes")]
        scroll_y:  bool,
    },
    FingerCount {
        #[serde(default = "defaults::history")]
        history: usize,
    },
    TouchSpeed {
        #[serde(default = "defaults::history")]
        history:         usize,
        #[serde(default = "defaults::speed_reduction")]
        speed_reduction: f32,
        #[serde(default = "defaults::good_threshold")]
        good_threshold:  f32,
    },
    ReadMore {
        #[serde(default = "defaults::basic_link")]
        basic_link:    String,
        #[serde(default = "defaults::advanced_link")]
        advanced_link: String,
    },
}

pub(crate) mod defaults {
    pub fn finger_size()     -> f32    { 2.0 }
    pub fn cell_size()       -> f32    { 100.0 }
    pub fn momentum()        -> f32    { 0.98 }
    pub fn yes()             -> bool   { true }
    /// Twenty frames of history plus the newest sample.
    pub fn history()         -> usize  { 21 }
    pub fn speed_reduction() -> f32    { 300.0 }
    pub fn good_threshold()  -> f32    { 0.5 }
    pub fn basic_link()      -> String { "bsc.html".to_string() }
    pub fn advanced_link()   -> String { "adv.html".to_string() }
}

impl TutorialKind {
    /// Container name used for the tutorial when the config gives none.
    pub fn default_name(&self) -> &'static str {
        match self {
            TutorialKind::TouchDistance { .. } => "touchDistance",
            TutorialKind::TouchScroll { .. }   => "touchScroll",
            TutorialKind::FingerCount { .. }   => "numberOf",
            TutorialKind::TouchSpeed { .. }    => "touchSpeed",
            TutorialKind::ReadMore { .. }      => "readMore",
        }
    }

    /// The five demos with stock settings, in page order.
    pub fn all_defaults() -> Vec<TutorialKind> {
        vec![
            TutorialKind::TouchDistance { finger_size: defaults::finger_size() },
            TutorialKind::TouchScroll {
                cell_size: defaults::cell_size(),
                momentum:  defaults::momentum(),
                scroll_x:  true,
                scroll_y:  true,
            },
            TutorialKind::FingerCount { history: defaults::history() },
            TutorialKind::TouchSpeed {
                history:         defaults::history(),
                speed_reduction: defaults::speed_reduction(),
                good_threshold:  defaults::good_threshold(),
            },
            TutorialKind::ReadMore {
                basic_link:    defaults::basic_link(),
                advanced_link: defaults::advanced_link(),
            },
        ]
    }

    /// Build the scene for a `width × height` canvas.
    pub fn build(&self, width: f32, height: f32) -> Box<dyn Scene> {
        match self {
            TutorialKind::TouchDistance { finger_size } => {
                Box::new(TouchDistance::new(*finger_size))
            }
            TutorialKind::TouchScroll { cell_size, momentum, scroll_x, scroll_y } => {
                Box::new(TouchScroll::new(*cell_size, *momentum, *scroll_x, *scroll_y))
            }
            TutorialKind::FingerCount { history } => Box::new(FingerCount::new(*history)),
            TutorialKind::TouchSpeed { history, speed_reduction, good_threshold } => {
                Box::new(TouchSpeed::new(width, height, *history, *speed_reduction, *good_threshold))
            }
            TutorialKind::ReadMore { basic_link, advanced_link } => {
                Box::new(ReadMore::new(width, height, basic_link, advanced_link))
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Lifecycle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// What the tutorial's container currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Nothing yet; the placeholder waits out its delay first.
    Hidden,
    Canvas,
    Placeholder,
}

// ════════════════════════════════════════════════════════════════════════════
// Tutorial
// ════════════════════════════════════════════════════════════════════════════

pub struct Tutorial {
    name:         String,
    container_id: String,
    canvas:       Canvas,
    placeholder:  Canvas,
    link:         LinkState,
    visibility:   Visibility,
    active:       bool,
    scene:        Box<dyn Scene>,
    frames_drawn: u64,
}

impl Tutorial {
    /// Tutorial sized from the viewport the way the page sizes its canvases.
    pub fn for_viewport(name: &str, kind: &TutorialKind, viewport_height: f32) -> Self {
        let (w, h) = canvas_size(viewport_height);
        Self::new(name, w, h, kind.build(w as f32, h as f32))
    }

    pub fn new(name: &str, width: usize, height: usize, scene: Box<dyn Scene>) -> Self {
        Tutorial {
            name:         name.to_string(),
            container_id: format!("{}Tutorial", name),
            canvas:       Canvas::new(width, height),
            placeholder:  plug_in_placeholder(width, height),
            link:         LinkState::Disconnected,
            visibility:   Visibility::Hidden,
            active:       true,
            scene,
            frames_drawn: 0,
        }
    }

    pub fn name(&self)         -> &str        { &self.name }
    pub fn container_id(&self) -> &str        { &self.container_id }
    pub fn canvas(&self)       -> &Canvas     { &self.canvas }
    pub fn link(&self)         -> LinkState   { self.link }
    pub fn visibility(&self)   -> Visibility  { self.visibility }
    pub fn is_active(&self)    -> bool        { self.active }
    pub fn frames_drawn(&self) -> u64         { self.frames_drawn }
    pub fn is_plugged_in(&self) -> bool       { self.link == LinkState::Connected }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn device_connect(&mut self) {
        if self.link != LinkState::Connected {
            info!(tutorial = %self.name, "device connected");
        }
        self.link = LinkState::Connected;
        self.visibility = Visibility::Canvas;
    }

    pub fn device_disconnect(&mut self) {
        if self.link != LinkState::Disconnected {
            info!(tutorial = %self.name, "device disconnected");
        }
        self.link = LinkState::Disconnected;
        self.visibility = Visibility::Placeholder;
    }

    /// Reveal the placeholder once `elapsed` passes `delay` with no device.
    /// Inactive tutorials stay as they are.
    pub fn poll_placeholder(&mut self, elapsed: Duration, delay: Duration) {
        if !self.active {
            return;
        }
        if self.visibility == Visibility::Hidden && !self.is_plugged_in() && elapsed >= delay {
            debug!(tutorial = %self.name, "showing plug-in placeholder");
            self.visibility = Visibility::Placeholder;
        }
    }

    /// Full repaint for one frame.
    pub fn draw(&mut self, frame: &FrameSnapshot, previous: &FrameSnapshot, events: &mut Vec<TutorialEvent>) {
        self.canvas.clear();
        let mut stage = Stage::new(&mut self.canvas, frame, previous, &self.name, events);
        self.scene.draw(&mut stage);
        self.frames_drawn += 1;
    }

    /// What a viewer should display right now, if anything.
    pub fn surface(&self) -> Option<&Canvas> {
        match self.visibility {
            Visibility::Hidden      => None,
            Visibility::Canvas      => Some(&self.canvas),
            Visibility::Placeholder => Some(&self.placeholder),
        }
    }
}

pub fn canvas_size(viewport_height: f32) -> (usize, usize) {
    let h = (viewport_height * VIEWPORT_SHARE).max(1.0);
    let w = h * ASPECT;
    (w.round() as usize, h.round() as usize)
}

/// Outline of the controller with a prompt underneath.
fn plug_in_placeholder(width: usize, height: usize) -> Canvas {
    let mut c = Canvas::new(width, height);
    let w = width as f32;
    let h = height as f32;
    let body_w = w * 0.4;
    let body_h = h * 0.08;
    c.fill_rect(-body_w / 2.0, -h * 0.55, body_w, body_h, Rgba::hex(0x333333));
    c.fill_rect(-body_w / 2.0 + 6.0, -h * 0.55 + 6.0, body_w - 12.0, body_h - 12.0, Rgba::hex(0x111111));
    c.fill_text("PLUG IN YOUR DEVICE", 0.0, -h * 0.35, w / 25.0, Rgba::hex(0x777777), Align::Center);
    c
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot;
    impl Scene for Dot {
        fn draw(&mut self, stage: &mut Stage<'_>) {
            if let Some(p) = stage.frame.first_pointable() {
                let p = p.clone();
                stage.draw_finger(&p, Some((0.0, 50.0)), 1.0);
            }
        }
    }

    fn frame_with_finger() -> FrameSnapshot {
        FrameSnapshot {
            pointables: vec![Pointable::at(1, Vec3::zero(), 0.5)],
            ..Default::default()
        }
    }

    #[test]
    fn container_follows_naming_convention() {
        let t = Tutorial::new("touchDistance", 30, 20, Box::new(Dot));
        assert_eq!(t.container_id(), "touchDistanceTutorial");
    }

    #[test]
    fn starts_disconnected_and_hidden() {
        let t = Tutorial::new("t", 30, 20, Box::new(Dot));
        assert_eq!(t.link(), LinkState::Disconnected);
        assert_eq!(t.visibility(), Visibility::Hidden);
        assert!(t.surface().is_none());
        assert!(t.is_active());
    }

    #[test]
    fn connect_disconnect_toggle_surface() {
        let mut t = Tutorial::new("t", 30, 20, Box::new(Dot));
        t.device_connect();
        assert!(t.is_plugged_in());
        assert_eq!(t.visibility(), Visibility::Canvas);
        t.device_disconnect();
        assert!(!t.is_plugged_in());
        assert_eq!(t.visibility(), Visibility::Placeholder);
        t.device_connect();
        assert_eq!(t.visibility(), Visibility::Canvas);
    }

    #[test]
    fn placeholder_waits_for_delay() {
        let mut t = Tutorial::new("t", 30, 20, Box::new(Dot));
        let delay = Duration::from_secs(1);
        t.poll_placeholder(Duration::from_millis(400), delay);
        assert_eq!(t.visibility(), Visibility::Hidden);
        t.poll_placeholder(Duration::from_millis(1000), delay);
        assert_eq!(t.visibility(), Visibility::Placeholder);
    }

    #[test]
    fn inactive_tutorial_keeps_placeholder_hidden() {
        let mut t = Tutorial::new("t", 30, 20, Box::new(Dot));
        t.set_active(false);
        t.poll_placeholder(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(t.visibility(), Visibility::Hidden);
    }

    #[test]
    fn placeholder_skipped_when_connected_early() {
        let mut t = Tutorial::new("t", 30, 20, Box::new(Dot));
        t.device_connect();
        t.poll_placeholder(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(t.visibility(), Visibility::Canvas);
    }

    #[test]
    fn every_draw_is_full_repaint() {
        let mut t = Tutorial::new("t", 200, 120, Box::new(Dot));
        let mut events = Vec::new();
        let f = frame_with_finger();
        t.draw(&f, &f, &mut events);
        assert!(t.canvas().painted_pixels() > 0);
        let empty = FrameSnapshot::default();
        t.draw(&empty, &f, &mut events);
        assert_eq!(t.canvas().painted_pixels(), 0);
        assert_eq!(t.frames_drawn(), 2);
    }

    #[test]
    fn viewport_sizing() {
        assert_eq!(canvas_size(600.0), (720, 480));
    }

    #[test]
    fn every_kind_builds_and_draws() {
        let mut events = Vec::new();
        let f = frame_with_finger();
        for kind in TutorialKind::all_defaults() {
            let mut t = Tutorial::for_viewport(kind.default_name(), &kind, 300.0);
            t.draw(&f, &f, &mut events);
            assert_eq!(t.frames_drawn(), 1, "{}", kind.default_name());
        }
    }
}
