//! Software-rendered tutorial viewer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ [touchDistance] [touchScroll] [numberOf] [...]       │  tab bar
//! ├──────────────────────────────────────────────────────┤
//! │                                                      │
//! │        selected tutorial's surface (canvas or        │
//! │        plug-in placeholder)                          │
//! │                                                      │
//! ├──────────────────────────────────────────────────────┤
//! │ status bar                                           │
//! │ key legend                                           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! In simulation mode the mouse over the surface is the finger: moving it
//! hovers, holding the left button pushes through the touch plane.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::canvas::char_glyph;
use crate::device::SimInput;
use crate::dispatcher::FrameDispatcher;
use crate::error::{Result, TutorialError};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const MARGIN:        usize = 12;
const TAB_H:         usize = 28;
const TAB_GAP:       usize = 6;
const STATUS_H:      usize = 44;
const LABEL_SCALE:   usize = 2;
const MIN_WIN_W:     usize = 640;
const HOVER_STEP:    f32   = 0.05;
const BG_COLOR:      u32   = 0xFF2B2B2B;
const TAB_COLOR:     u32   = 0xFF3C3C3C;
const TAB_SELECTED:  u32   = 0xFFF0F0F0;
const TAB_TEXT:      u32   = 0xFFCCCCCC;
const TAB_INACTIVE:  u32   = 0xFF777777;
const PANEL_EMPTY:   u32   = 0xFFDDDDDD;
const TEXT_BG:       u32   = 0xFF1F1F1F;

const LEGEND: &str = "TAB=NEXT  UP/DOWN=HOVER  0-5=FINGERS  P=PLUG  Q=QUIT  MOUSE=FINGER  CLICK=TOUCH";

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

/// Window geometry for a given tutorial canvas size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub win_w:    usize,
    pub win_h:    usize,
    pub canvas_x: usize,
    pub canvas_y: usize,
    pub canvas_w: usize,
    pub canvas_h: usize,
    pub status_y: usize,
}

impl Layout {
    pub fn new(canvas_w: usize, canvas_h: usize) -> Self {
        let win_w = (canvas_w + 2 * MARGIN).max(MIN_WIN_W);
        let canvas_y = TAB_H + MARGIN;
        let status_y = canvas_y + canvas_h + MARGIN;
        Layout {
            win_w,
            win_h: status_y + STATUS_H,
            canvas_x: (win_w - canvas_w) / 2,
            canvas_y,
            canvas_w,
            canvas_h,
            status_y,
        }
    }

    /// Mouse position → normalised canvas coordinates, clamped to the edges.
    pub fn pointer(&self, mx: f32, my: f32) -> (f32, f32) {
        let u = (mx - self.canvas_x as f32) / self.canvas_w.max(1) as f32;
        let v = (my - self.canvas_y as f32) / self.canvas_h.max(1) as f32;
        (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
    }

    /// Horizontal extents of each tab, sized to its label.
    pub fn tabs<'a>(&self, names: impl Iterator<Item = &'a str>) -> Vec<(usize, usize)> {
        let mut x = MARGIN;
        names
            .map(|n| {
                let w = label_width(n) + 2 * MARGIN;
                let tab = (x, w);
                x += w + TAB_GAP;
                tab
            })
            .collect()
    }
}

fn label_width(text: &str) -> usize {
    text.chars().count() * 4 * LABEL_SCALE
}

// ════════════════════════════════════════════════════════════════════════════
// Viewer
// ════════════════════════════════════════════════════════════════════════════

pub struct Viewer {
    window:   Window,
    buf:      Vec<u32>,
    layout:   Layout,
    /// `None` when frames come from real hardware.
    sim_tx:   Option<Sender<SimInput>>,
    selected: usize,
    tab_count: usize,
    was_down: bool,
}

impl Viewer {
    pub fn new(
        canvas_w: usize,
        canvas_h: usize,
        tab_count: usize,
        initial_tab: usize,
        sim_tx: Option<Sender<SimInput>>,
    ) -> Result<Self> {
        let layout = Layout::new(canvas_w, canvas_h);
        let mut window = Window::new(
            "Touch Tutorials",
            layout.win_w, layout.win_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| TutorialError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Viewer {
            window,
            buf: vec![BG_COLOR; layout.win_w * layout.win_h],
            layout,
            sim_tx,
            selected: initial_tab.min(tab_count.saturating_sub(1)),
            tab_count,
            was_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }
    pub fn selected(&self) -> usize { self.selected }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Poll keyboard and mouse; returns false when the window should close.
    pub fn poll_input(&mut self, names: &[&str]) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            self.send(SimInput::Quit);
            return false;
        }
        if one_shot(Key::Tab) && self.tab_count > 0 {
            self.selected = (self.selected + 1) % self.tab_count;
        }
        if one_shot(Key::P) {
            self.send(SimInput::TogglePlug);
        }
        if held(Key::Up) {
            self.send(SimInput::AdjustHover(HOVER_STEP));
        }
        if held(Key::Down) {
            self.send(SimInput::AdjustHover(-HOVER_STEP));
        }
        let digits = [Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5];
        for (n, key) in digits.iter().enumerate() {
            if self.window.is_key_pressed(*key, KeyRepeat::No) {
                self.send(SimInput::Fingers(n as u8));
            }
        }

        let down = self.window.get_mouse_down(MouseButton::Left);
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            // A click in the tab bar switches tabs instead of touching.
            if down && !self.was_down && (my as usize) < TAB_H {
                let tabs = self.layout.tabs(names.iter().copied());
                if let Some(i) = tabs.iter().position(|&(x, w)| (mx as usize) >= x && (mx as usize) < x + w) {
                    self.selected = i;
                }
            } else {
                let (u, v) = self.layout.pointer(mx, my);
                self.send(SimInput::Pointer { u, v, pressed: down });
            }
        }
        self.was_down = down;

        true
    }

    /// Render one frame.
    pub fn render(&mut self, dispatcher: &FrameDispatcher, status: &str) {
        let Layout { win_w, win_h, canvas_x, canvas_y, canvas_w, canvas_h, status_y } = self.layout;

        // Clear
        self.buf.fill(BG_COLOR);

        // ── Tab bar ───────────────────────────────────────────────────────
        let names: Vec<&str> = dispatcher.iter().map(|t| t.name()).collect();
        let tabs = self.layout.tabs(names.iter().copied());
        for (i, (t, &(x, w))) in dispatcher.iter().zip(tabs.iter()).enumerate() {
            if x + w > win_w { break; }
            let selected = i == self.selected;
            let (bg, fg) = match (selected, t.is_active()) {
                (true, _)      => (TAB_SELECTED, 0xFF222222),
                (false, true)  => (TAB_COLOR, TAB_TEXT),
                (false, false) => (TAB_COLOR, TAB_INACTIVE),
            };
            self.fill_rect(x, 4, w, TAB_H - 4, bg);
            self.draw_label(t.name(), x + MARGIN, 4 + (TAB_H - 4 - 5 * LABEL_SCALE) / 2, fg);
        }

        // ── Tutorial surface ──────────────────────────────────────────────
        let surface = dispatcher.iter().nth(self.selected).and_then(|t| t.surface());
        match surface {
            Some(canvas) => canvas.blit_into(&mut self.buf, win_w, canvas_x, canvas_y),
            None => self.fill_rect(canvas_x, canvas_y, canvas_w, canvas_h, PANEL_EMPTY),
        }
        self.draw_border(canvas_x.saturating_sub(1), canvas_y.saturating_sub(1), canvas_w + 2, canvas_h + 2, TAB_COLOR);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, status_y, win_w, win_h - status_y, TEXT_BG);
        self.draw_label(status, MARGIN, status_y + 8, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        if self.sim_tx.is_some() {
            self.draw_label(LEGEND, MARGIN, win_h - 16, 0xFF888888);
        }

        self.window.update_with_buffer(&self.buf, win_w, win_h).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let (ww, wh) = (self.layout.win_w, self.layout.win_h);
        for row in y..(y + h).min(wh) {
            for col in x..(x + w).min(ww) {
                self.buf[row * ww + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        let (ww, wh) = (self.layout.win_w, self.layout.win_h);
        if x < ww && y < wh {
            self.buf[y * ww + x] = color;
        }
    }

    /// 3×5 bitmap text, each font cell drawn `LABEL_SCALE` pixels square.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * LABEL_SCALE, y + row * LABEL_SCALE, LABEL_SCALE, LABEL_SCALE, color);
                    }
                }
            }
            cx += 4 * LABEL_SCALE;
            if cx + 4 * LABEL_SCALE > self.layout.win_w { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_centres_canvas() {
        let l = Layout::new(720, 480);
        assert_eq!(l.win_w, 744);
        assert_eq!(l.canvas_x, 12);
        assert_eq!(l.canvas_y, TAB_H + MARGIN);
        assert_eq!(l.win_h, l.canvas_y + 480 + MARGIN + STATUS_H);
    }

    #[test]
    fn small_canvas_gets_minimum_width() {
        let l = Layout::new(300, 200);
        assert_eq!(l.win_w, MIN_WIN_W);
        assert_eq!(l.canvas_x, (MIN_WIN_W - 300) / 2);
    }

    #[test]
    fn pointer_is_normalised_and_clamped() {
        let l = Layout::new(720, 480);
        let (cx, cy) = (l.canvas_x as f32, l.canvas_y as f32);
        assert_eq!(l.pointer(cx, cy), (0.0, 0.0));
        assert_eq!(l.pointer(cx + 360.0, cy + 240.0), (0.5, 0.5));
        assert_eq!(l.pointer(0.0, 0.0), (0.0, 0.0));
        assert_eq!(l.pointer(10_000.0, 10_000.0), (1.0, 1.0));
    }

    #[test]
    fn tabs_are_laid_out_left_to_right() {
        let l = Layout::new(720, 480);
        let tabs = l.tabs(["ab", "cdef"].into_iter());
        assert_eq!(tabs[0], (MARGIN, label_width("ab") + 2 * MARGIN));
        assert_eq!(tabs[1].0, tabs[0].0 + tabs[0].1 + TAB_GAP);
        assert!(tabs[1].1 > tabs[0].1);
    }
}
