//! Software 2D canvas.
//!
//! A `Vec<u32>` framebuffer (`0xAARRGGBB`, what `minifb` displays) with the
//! drawing origin moved to the bottom-centre so scene coordinates line up
//! with the device: `x ∈ [-w/2, w/2]`, and "up" is negative `y`.
//!
//! All drawing is immediate and alpha-blended.  Any call that receives a
//! non-finite coordinate draws nothing.

// ════════════════════════════════════════════════════════════════════════════
// Rgba
// ════════════════════════════════════════════════════════════════════════════

/// 8-bit colour with a fractional alpha, like a CSS `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Rgba {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 1.0,
        }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const WHITE:       Rgba = Rgba::hex(0xFFFFFF);
    pub const BLACK:       Rgba = Rgba::hex(0x000000);

    pub fn with_alpha(self, a: f32) -> Self {
        Rgba { a, ..self }
    }

    /// Packed opaque ARGB, ignoring alpha.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Composite this colour over an opaque destination pixel.
    pub fn blend_over(self, dst: u32) -> u32 {
        let a = if self.a.is_finite() { self.a.clamp(0.0, 1.0) } else { 0.0 };
        if a <= 0.0 {
            return dst;
        }
        if a >= 1.0 {
            return self.to_argb();
        }
        let mix = |src: u8, shift: u32| {
            let d = ((dst >> shift) & 0xFF) as f32;
            (src as f32 * a + d * (1.0 - a)).round() as u32
        };
        0xFF00_0000 | (mix(self.r, 16) << 16) | (mix(self.g, 8) << 8) | mix(self.b, 0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

pub const CANVAS_BG: u32 = 0xFFFFFFFF;

#[derive(Clone, Debug)]
pub struct Canvas {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
    background: u32,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, CANVAS_BG)
    }

    pub fn with_background(width: usize, height: usize, background: u32) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![background; width * height],
            background,
        }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    /// Erase everything drawn so far.
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Pixel under scene coordinate `(x, y)`, if on the canvas.
    pub fn pixel_at(&self, x: f32, y: f32) -> Option<u32> {
        let (px, py) = self.to_pixel(x, y)?;
        if px < 0 || py < 0 || px >= self.width as isize || py >= self.height as isize {
            return None;
        }
        Some(self.pixels[py as usize * self.width + px as usize])
    }

    /// Number of pixels that differ from the background.
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != self.background).count()
    }

    fn to_pixel(&self, x: f32, y: f32) -> Option<(isize, isize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let px = (x + self.width as f32 / 2.0).floor() as isize;
        let py = (y + self.height as f32).floor() as isize;
        Some((px, py))
    }

    fn blend_pixel(&mut self, px: isize, py: isize, color: Rgba) {
        if px < 0 || py < 0 || px >= self.width as isize || py >= self.height as isize {
            return;
        }
        let i = py as usize * self.width + px as usize;
        self.pixels[i] = color.blend_over(self.pixels[i]);
    }

    // ── Rectangles ────────────────────────────────────────────────────────

    /// Fill the rectangle spanned by `(x, y)` and `(x + w, y + h)`.
    /// Negative extents are allowed and grow toward negative coordinates.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return;
        }
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
        let ox = self.width as f32 / 2.0;
        let oy = self.height as f32;

        let c0 = ((x0 + ox).round() as isize).max(0);
        let c1 = ((x1 + ox).round() as isize).min(self.width as isize);
        let r0 = ((y0 + oy).round() as isize).max(0);
        let r1 = ((y1 + oy).round() as isize).min(self.height as isize);

        for row in r0..r1 {
            for col in c0..c1 {
                self.blend_pixel(col, row, color);
            }
        }
    }

    // ── Lines ─────────────────────────────────────────────────────────────

    /// Connected line segments of `line_width` through `points`.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], line_width: f32, color: Rgba) {
        let half = (line_width / 2.0).max(0.5);
        for seg in points.windows(2) {
            let (ax, ay) = seg[0];
            let (bx, by) = seg[1];
            if ![ax, ay, bx, by].iter().all(|v| v.is_finite()) {
                continue;
            }
            let (x0, x1) = (ax.min(bx) - half, ax.max(bx) + half);
            let (y0, y1) = (ay.min(by) - half, ay.max(by) + half);
            // Segments here are axis-aligned or close to it; a swept box
            // around the segment covers them exactly.
            if (ax - bx).abs() < 0.5 || (ay - by).abs() < 0.5 {
                self.fill_rect(x0, y0, x1 - x0, y1 - y0, color);
                continue;
            }
            let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
            let steps = (len * 2.0).ceil() as usize;
            for s in 0..=steps {
                let t = s as f32 / steps as f32;
                let cx = ax + (bx - ax) * t;
                let cy = ay + (by - ay) * t;
                self.fill_rect(cx - half, cy - half, half * 2.0, half * 2.0, color);
            }
        }
    }

    // ── Circles ───────────────────────────────────────────────────────────

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.for_each_in_ring(cx, cy, 0.0, radius, |canvas, px, py, _| {
            canvas.blend_pixel(px, py, color);
        });
    }

    /// Outline centred on the circle's edge, `line_width` wide.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Rgba) {
        let half = line_width / 2.0;
        self.for_each_in_ring(cx, cy, (radius - half).max(0.0), radius + half, |canvas, px, py, _| {
            canvas.blend_pixel(px, py, color);
        });
    }

    /// Soft halo fading out over `blur` pixels beyond `radius`.
    pub fn glow(&mut self, cx: f32, cy: f32, radius: f32, blur: f32, color: Rgba) {
        if blur <= 0.0 {
            return;
        }
        let spread = blur / 2.0;
        self.for_each_in_ring(cx, cy, radius, radius + spread, |canvas, px, py, d| {
            let falloff = 1.0 - (d - radius) / spread;
            canvas.blend_pixel(px, py, color.with_alpha(color.a * falloff * 0.6));
        });
    }

    fn for_each_in_ring<F>(&mut self, cx: f32, cy: f32, inner: f32, outer: f32, mut f: F)
    where
        F: FnMut(&mut Canvas, isize, isize, f32),
    {
        if ![cx, cy, inner, outer].iter().all(|v| v.is_finite()) || outer <= 0.0 {
            return;
        }
        let Some((pcx, pcy)) = self.to_pixel(cx, cy) else { return };
        let reach = outer.ceil() as isize;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                if d >= inner && d <= outer {
                    f(self, pcx + dx, pcy + dy, d);
                }
            }
        }
    }

    // ── Text ──────────────────────────────────────────────────────────────

    /// Bitmap text with its baseline at `y`.  `px_size` approximates a CSS
    /// font size; glyphs are 3×5 cells scaled to it.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, px_size: f32, color: Rgba, align: Align) {
        if !x.is_finite() || !y.is_finite() || !px_size.is_finite() {
            return;
        }
        let cell = (px_size / 6.0).max(1.0).floor();
        let advance = 4.0 * cell;
        let total = advance * text.chars().count() as f32 - cell;
        let mut cx = match align {
            Align::Left   => x,
            Align::Center => x - total / 2.0,
        };
        let top = y - 5.0 * cell;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(
                            cx + col as f32 * cell,
                            top + row as f32 * cell,
                            cell,
                            cell,
                            color,
                        );
                    }
                }
            }
            cx += advance;
        }
    }

    /// Copy into a larger row-major buffer at pixel offset `(x, y)`.
    pub fn blit_into(&self, dst: &mut [u32], dst_w: usize, x: usize, y: usize) {
        let dst_h = dst.len() / dst_w.max(1);
        for row in 0..self.height {
            let ty = y + row;
            if ty >= dst_h { break; }
            let src = &self.pixels[row * self.width..(row + 1) * self.width];
            let avail = dst_w.saturating_sub(x).min(self.width);
            let start = ty * dst_w + x;
            dst[start..start + avail].copy_from_slice(&src[..avail]);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_bottom_centre() {
        let mut c = Canvas::new(100, 50);
        c.fill_rect(0.0, -1.0, 1.0, 1.0, Rgba::BLACK);
        assert_eq!(c.pixels()[49 * 100 + 50], 0xFF000000);
        assert_eq!(c.painted_pixels(), 1);
    }

    #[test]
    fn negative_extent_rect_normalises() {
        let mut a = Canvas::new(40, 40);
        let mut b = Canvas::new(40, 40);
        a.fill_rect(-10.0, -20.0, 10.0, 10.0, Rgba::BLACK);
        b.fill_rect(0.0, -10.0, -10.0, -10.0, Rgba::BLACK);
        assert_eq!(a.pixels(), b.pixels());
        assert_eq!(a.painted_pixels(), 100);
    }

    #[test]
    fn rect_is_clipped() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(-100.0, -100.0, 500.0, 500.0, Rgba::BLACK);
        assert_eq!(c.painted_pixels(), 100);
    }

    #[test]
    fn non_finite_draws_nothing() {
        let mut c = Canvas::new(20, 20);
        c.fill_rect(f32::NAN, 0.0, 5.0, 5.0, Rgba::BLACK);
        c.fill_circle(f32::INFINITY, -5.0, 3.0, Rgba::BLACK);
        c.fill_text("hi", f32::NAN, -5.0, 12.0, Rgba::BLACK, Align::Center);
        assert_eq!(c.painted_pixels(), 0);
    }

    #[test]
    fn half_alpha_blends_with_white() {
        let px = Rgba::new(0, 0, 0, 0.5).blend_over(0xFFFFFFFF);
        assert_eq!(px, 0xFF808080);
    }

    #[test]
    fn zero_alpha_leaves_pixel() {
        assert_eq!(Rgba::new(255, 0, 0, 0.0).blend_over(0xFF123456), 0xFF123456);
        assert_eq!(Rgba::new(255, 0, 0, -0.01).blend_over(0xFF123456), 0xFF123456);
    }

    #[test]
    fn clear_restores_background() {
        let mut c = Canvas::new(10, 10);
        c.fill_circle(0.0, -5.0, 3.0, Rgba::BLACK);
        assert!(c.painted_pixels() > 0);
        c.clear();
        assert_eq!(c.painted_pixels(), 0);
    }

    #[test]
    fn circle_centre_is_painted() {
        let mut c = Canvas::new(60, 60);
        c.fill_circle(0.0, -30.0, 10.0, Rgba::BLACK);
        assert_eq!(c.pixel_at(0.0, -30.0), Some(0xFF000000));
        assert_eq!(c.pixel_at(0.0, -45.0), Some(CANVAS_BG));
    }

    #[test]
    fn text_paints_something() {
        let mut c = Canvas::new(200, 60);
        c.fill_text("touch", 0.0, -20.0, 18.0, Rgba::BLACK, Align::Center);
        assert!(c.painted_pixels() > 0);
    }

    #[test]
    fn blit_copies_rows() {
        let mut c = Canvas::with_background(2, 2, 0xFF00FF00);
        c.fill_rect(-1.0, -2.0, 1.0, 1.0, Rgba::BLACK);
        let mut dst = vec![0u32; 4 * 3];
        c.blit_into(&mut dst, 4, 1, 1);
        assert_eq!(dst[4 + 1], 0xFF000000);
        assert_eq!(dst[4 + 2], 0xFF00FF00);
        assert_eq!(dst[0], 0);
    }
}
