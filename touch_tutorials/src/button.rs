//! Touchable rectangular buttons.
//!
//! A [`Button`] is an axis-aligned box in canvas coordinates with a hover
//! tint and a "click flash" overlay that fades by a fixed step each draw.
//! A [`ButtonSet`] owns all buttons of one tutorial and tracks which one,
//! if any, is under the pointer.

use crate::canvas::{Canvas, Rgba};

pub const BASE_COLOR:  Rgba = Rgba::new(200, 200, 200, 0.9);
pub const HOVER_COLOR: Rgba = Rgba::new(150, 150, 150, 0.9);

/// Alpha removed from the click flash on every draw.
pub const CLICK_FADE_STEP: f32 = 0.01;

// ════════════════════════════════════════════════════════════════════════════
// Button
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Button {
    /// Centre, canvas coordinates.
    pub position: (f32, f32),
    pub width:    f32,
    pub height:   f32,
    pub left:     f32,
    pub right:    f32,
    pub top:      f32,
    pub bottom:   f32,
    color:        Rgba,
    click_color:  Rgba,
    hovered:      bool,
}

impl Button {
    pub fn new(position: (f32, f32), width: f32, height: f32) -> Self {
        Button {
            position,
            width,
            height,
            left:   position.0 - width / 2.0,
            right:  position.0 + width / 2.0,
            top:    position.1 + height / 2.0,
            bottom: position.1 - height / 2.0,
            color:       BASE_COLOR,
            click_color: Rgba::TRANSPARENT,
            hovered:     false,
        }
    }

    /// `pos` is a scene position (`y` up), the box is in canvas space
    /// (`y` down), hence the flipped vertical test.
    pub fn contains(&self, pos: (f32, f32)) -> bool {
        let (x, y) = pos;
        x >= self.left && x <= self.right && -y <= self.top && -y >= self.bottom
    }

    /// Hover test that also maintains the owner's current-button slot.
    ///
    /// On entry the button tints and claims `current`.  On exit it untints
    /// and releases `current` only if it was the holder, so checking several
    /// buttons in one pass never clears another button's hover.
    pub fn check_inside(&mut self, id: usize, pos: (f32, f32), current: &mut Option<usize>) -> bool {
        if self.contains(pos) {
            if !self.hovered {
                self.hovered = true;
                self.color = HOVER_COLOR;
            }
            *current = Some(id);
            true
        } else {
            if *current == Some(id) {
                *current = None;
            }
            if self.hovered {
                self.hovered = false;
                self.color = BASE_COLOR;
            }
            false
        }
    }

    /// Paint the button and its click flash, then fade the flash one step.
    pub fn draw(&mut self, canvas: &mut Canvas) {
        canvas.fill_rect(self.left, self.bottom, self.width, self.height, self.color);
        canvas.fill_rect(self.left, self.bottom, self.width, self.height, self.click_color);
        self.click_color.a = (self.click_color.a - CLICK_FADE_STEP).max(0.0);
    }

    /// Start a click flash in `color` at full opacity.
    pub fn click(&mut self, color: Rgba) {
        self.click_color = color.with_alpha(1.0);
    }

    pub fn color(&self)       -> Rgba { self.color }
    pub fn click_color(&self) -> Rgba { self.click_color }
    pub fn click_alpha(&self) -> f32  { self.click_color.a }
    pub fn is_hovered(&self)  -> bool { self.hovered }
}

// ════════════════════════════════════════════════════════════════════════════
// ButtonSet
// ════════════════════════════════════════════════════════════════════════════

/// The buttons of one tutorial.  At most one is current at any time.
#[derive(Clone, Debug, Default)]
pub struct ButtonSet {
    buttons: Vec<Button>,
    current: Option<usize>,
}

impl ButtonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a button; returns its index.
    pub fn push(&mut self, button: Button) -> usize {
        self.buttons.push(button);
        self.buttons.len() - 1
    }

    pub fn len(&self) -> usize { self.buttons.len() }
    pub fn is_empty(&self) -> bool { self.buttons.is_empty() }
    pub fn get(&self, index: usize) -> Option<&Button> { self.buttons.get(index) }
    pub fn iter(&self) -> impl Iterator<Item = &Button> { self.buttons.iter() }

    pub fn current(&self) -> Option<usize> { self.current }

    pub fn current_button(&self) -> Option<&Button> {
        self.current.and_then(|i| self.buttons.get(i))
    }

    /// Hover-test one button against `pos`.
    pub fn check(&mut self, index: usize, pos: (f32, f32)) -> bool {
        match self.buttons.get_mut(index) {
            Some(b) => b.check_inside(index, pos, &mut self.current),
            None => false,
        }
    }

    /// Hover-test every button in order.
    pub fn check_all(&mut self, pos: (f32, f32)) {
        for (i, b) in self.buttons.iter_mut().enumerate() {
            b.check_inside(i, pos, &mut self.current);
        }
    }

    pub fn draw_all(&mut self, canvas: &mut Canvas) {
        for b in &mut self.buttons {
            b.draw(canvas);
        }
    }

    /// Hover-test then draw each button in turn.
    pub fn check_and_draw_all(&mut self, pos: (f32, f32), canvas: &mut Canvas) {
        for (i, b) in self.buttons.iter_mut().enumerate() {
            b.check_inside(i, pos, &mut self.current);
            b.draw(canvas);
        }
    }

    /// Flash the current button.  Returns false when nothing is hovered.
    pub fn click_current(&mut self, color: Rgba) -> bool {
        match self.current.and_then(|i| self.buttons.get_mut(i)) {
            Some(b) => {
                b.click(color);
                true
            }
            None => false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
