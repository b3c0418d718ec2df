use crossterm::style::Color;
use std::fmt::Write as _;

/// How to render sub-cell pixels to terminal characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Unicode braille characters (2x4 per cell = highest resolution)
    Braille,
    /// Half-block characters ▀▄█ (1x2 per cell)
    HalfBlock,
    /// Plain ASCII characters with density mapping
    Ascii,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Monochrome
    Mono,
    /// ANSI 16 colors
    Ansi16,
    /// 256-color palette
    Ansi256,
    /// 24-bit true color (RGB)
    TrueColor,
}

/// Text placed on top of the pixel grid at terminal-cell coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub col: usize,
    pub row: usize,
    pub text: String,
    pub fg: (u8, u8, u8),
    /// Drawn behind the glyphs so text stays readable over bursts
    pub bg: Option<(u8, u8, u8)>,
}

/// A pixel-level canvas that gets rendered to terminal characters.
/// Coordinates are in "sub-cell" pixel space.
pub struct Canvas {
    /// Width in pixels (sub-cell)
    pub width: usize,
    /// Height in pixels (sub-cell)
    pub height: usize,
    /// Pixel data: brightness 0.0..=1.0
    pub pixels: Vec<f64>,
    /// Per-pixel color (used when color mode != Mono)
    pub colors: Vec<(u8, u8, u8)>,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    /// Color quantization step (0 = off, 4/8/16 = round RGB to nearest N).
    pub color_quant: u8,
    /// Text queued for this frame; cleared by `fade`
    pub overlays: Vec<TextOverlay>,
}

impl Canvas {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let (cw, ch) = cell_size(render_mode);
        let (px_w, px_h) = (term_cols * cw, term_rows * ch);
        let size = px_w * px_h;
        Canvas {
            width: px_w,
            height: px_h,
            pixels: vec![0.0; size],
            colors: vec![(255, 255, 255); size],
            render_mode,
            color_mode,
            color_quant: 0,
            overlays: Vec::new(),
        }
    }

    /// Dim every pixel by `amount` (0.0 keeps, 1.0 clears) so moving points
    /// leave short trails.
    pub fn fade(&mut self, amount: f64) {
        let keep = (1.0 - amount).clamp(0.0, 1.0);
        for p in &mut self.pixels {
            *p *= keep;
        }
        self.overlays.clear();
    }

    /// Brighten a pixel: keeps whichever of the old and new values is brighter.
    #[inline]
    pub fn blend(&mut self, x: usize, y: usize, brightness: f64, rgb: (u8, u8, u8)) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if brightness >= self.pixels[idx] {
                self.pixels[idx] = brightness.clamp(0.0, 1.0);
                self.colors[idx] = rgb;
            }
        }
    }

    /// Queue `text` centered on the cell containing pixel (`px`, `py`).
    /// Text that runs off the right edge is clipped.
    pub fn put_text(&mut self, px: usize, py: usize, text: &str, fg: (u8, u8, u8), bg: Option<(u8, u8, u8)>) {
        let (cols, rows) = self.term_size();
        let (cw, ch) = cell_size(self.render_mode);
        let (cx, row) = (px / cw, py / ch);
        if row >= rows || cols == 0 {
            return;
        }
        let len = text.chars().count();
        let col = cx.saturating_sub(len / 2).min(cols.saturating_sub(1));
        let text: String = text.chars().take(cols - col).collect();
        if text.is_empty() {
            return;
        }
        self.overlays.push(TextOverlay { col, row, text, fg, bg });
    }

    /// Terminal dimensions needed for this canvas
    pub fn term_size(&self) -> (usize, usize) {
        let (cw, ch) = cell_size(self.render_mode);
        (self.width / cw, self.height / ch)
    }

    /// Render the canvas, then any text overlays, to a string buffer for output
    pub fn render(&self) -> String {
        let mut out = match self.render_mode {
            RenderMode::Braille => super::braille::render(self),
            RenderMode::HalfBlock => super::halfblock::render(self),
            RenderMode::Ascii => self.render_ascii(),
        };
        self.render_overlays(&mut out);
        out
    }

    fn render_overlays(&self, out: &mut String) {
        for o in &self.overlays {
            let _ = write!(out, "\x1b[{};{}H", o.row + 1, o.col + 1);
            if self.color_mode != ColorMode::Mono {
                let fg = color_to_fg(self.map_color(o.fg.0, o.fg.1, o.fg.2));
                match o.bg {
                    Some((r, g, b)) => {
                        let bg = color_to_bg(self.map_color(r, g, b));
                        let _ = write!(out, "\x1b[1;{fg};{bg}m");
                    }
                    None => {
                        let _ = write!(out, "\x1b[1;{fg}m");
                    }
                }
            } else {
                out.push_str("\x1b[1m");
            }
            out.push_str(&o.text);
            out.push_str("\x1b[0m");
        }
    }

    fn render_ascii(&self) -> String {
        const CHARS: &[u8] = b" .:-=+*#%@";
        let (cols, rows) = self.term_size();
        let mut out = String::with_capacity(cols * rows * 10);
        let use_color = self.color_mode != ColorMode::Mono;
        let mut last_fg = String::new();

        for row in 0..rows {
            for col in 0..cols {
                let idx = row * self.width + col;
                let v = self.pixels[idx].clamp(0.0, 1.0);
                let ch = CHARS[(v * (CHARS.len() - 1) as f64) as usize] as char;

                if use_color && ch != ' ' {
                    let (r, g, b) = self.colors[idx];
                    let fg = color_to_fg(self.map_color(r, g, b));
                    if fg != last_fg {
                        let _ = write!(out, "\x1b[{fg}m");
                        last_fg = fg;
                    }
                }
                out.push(ch);
            }
            let _ = write!(out, "\x1b[0m\x1b[{};1H", row + 2);
            last_fg.clear();
        }
        out
    }

    pub fn map_color(&self, r: u8, g: u8, b: u8) -> Color {
        // Apply color quantization if enabled (reduces unique colors for better dedup)
        let (r, g, b) = if self.color_quant > 1 {
            let q = self.color_quant as u16;
            let quant = |c: u8| ((c as u16 + q / 2) / q * q).min(255) as u8;
            (quant(r), quant(g), quant(b))
        } else {
            (r, g, b)
        };
        match self.color_mode {
            ColorMode::Mono => Color::White,
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            ColorMode::Ansi256 => {
                // Approximate RGB to 256-color cube
                let idx = 16 + (36 * (r as u16 / 51)) + (6 * (g as u16 / 51)) + (b as u16 / 51);
                Color::AnsiValue(idx as u8)
            }
            ColorMode::Ansi16 => {
                let brightness = (r as u16 + g as u16 + b as u16) / 3;
                let bright = brightness > 180;
                if brightness < 64 {
                    Color::Black
                } else if r > g && r > b {
                    if bright { Color::Red } else { Color::DarkRed }
                } else if g > r && g > b {
                    if bright { Color::Green } else { Color::DarkGreen }
                } else if b > r && b > g {
                    if bright { Color::Blue } else { Color::DarkBlue }
                } else if r == g && r > b {
                    if bright { Color::Yellow } else { Color::DarkYellow }
                } else if bright {
                    Color::White
                } else {
                    Color::Grey
                }
            }
        }
    }
}

/// Pixels per terminal cell for a render mode.
pub fn cell_size(mode: RenderMode) -> (usize, usize) {
    match mode {
        RenderMode::Braille => (2, 4),
        RenderMode::HalfBlock => (1, 2),
        RenderMode::Ascii => (1, 1),
    }
}

pub fn color_to_fg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("38;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("38;5;{}", v),
        Color::Black => "30".into(),
        Color::DarkRed => "31".into(),
        Color::DarkGreen => "32".into(),
        Color::DarkYellow => "33".into(),
        Color::DarkBlue => "34".into(),
        Color::DarkMagenta => "35".into(),
        Color::DarkCyan => "36".into(),
        Color::Grey => "37".into(),
        Color::DarkGrey => "90".into(),
        Color::Red => "91".into(),
        Color::Green => "92".into(),
        Color::Yellow => "93".into(),
        Color::Blue => "94".into(),
        Color::Magenta => "95".into(),
        Color::Cyan => "96".into(),
        Color::White => "97".into(),
        _ => "37".into(),
    }
}

pub fn color_to_bg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("48;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("48;5;{}", v),
        Color::Black => "40".into(),
        Color::DarkRed => "41".into(),
        Color::DarkGreen => "42".into(),
        Color::DarkYellow => "43".into(),
        Color::DarkBlue => "44".into(),
        Color::DarkMagenta => "45".into(),
        Color::DarkCyan => "46".into(),
        Color::Grey => "47".into(),
        Color::DarkGrey => "100".into(),
        Color::Red => "101".into(),
        Color::Green => "102".into(),
        Color::Yellow => "103".into(),
        Color::Blue => "104".into(),
        Color::Magenta => "105".into(),
        Color::Cyan => "106".into(),
        Color::White => "107".into(),
        _ => "40".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_per_mode() {
        let c = Canvas::new(80, 24, RenderMode::Braille, ColorMode::TrueColor);
        assert_eq!((c.width, c.height), (160, 96));
        assert_eq!(c.term_size(), (80, 24));
        let c = Canvas::new(80, 24, RenderMode::HalfBlock, ColorMode::TrueColor);
        assert_eq!((c.width, c.height), (80, 48));
    }

    #[test]
    fn test_fade_dims_and_drops_text() {
        let mut c = Canvas::new(4, 4, RenderMode::Ascii, ColorMode::Mono);
        c.blend(1, 1, 1.0, (255, 0, 0));
        c.put_text(0, 0, "hi", (255, 255, 255), None);
        c.fade(0.25);
        assert!((c.pixels[5] - 0.75).abs() < 1e-12);
        assert!(c.overlays.is_empty());
    }

    #[test]
    fn test_blend_keeps_brighter() {
        let mut c = Canvas::new(4, 4, RenderMode::Ascii, ColorMode::TrueColor);
        c.blend(2, 2, 0.8, (1, 2, 3));
        c.blend(2, 2, 0.3, (9, 9, 9));
        let idx = 2 * 4 + 2;
        assert_eq!(c.pixels[idx], 0.8);
        assert_eq!(c.colors[idx], (1, 2, 3));
        c.blend(99, 99, 1.0, (0, 0, 0));
    }

    #[test]
    fn test_put_text_centers_and_clips() {
        let mut c = Canvas::new(10, 5, RenderMode::Braille, ColorMode::TrueColor);
        c.put_text(10, 8, "abcd", (255, 0, 0), Some((0, 0, 0)));
        assert_eq!(c.overlays[0].col, 3);
        assert_eq!(c.overlays[0].row, 2);

        c.put_text(19, 0, "abcdefgh", (255, 0, 0), None);
        assert_eq!(c.overlays[1].text, "abcde");

        c.put_text(0, 400, "gone", (255, 0, 0), None);
        assert_eq!(c.overlays.len(), 2);
    }

    #[test]
    fn test_render_appends_overlay() {
        let mut c = Canvas::new(10, 3, RenderMode::HalfBlock, ColorMode::TrueColor);
        c.put_text(5, 2, "Joy", (255, 200, 0), Some((0, 0, 0)));
        let out = c.render();
        assert!(out.ends_with("\x1b[2;5H\x1b[1;38;2;255;200;0;48;2;0;0;0mJoy\x1b[0m"));
    }

    #[test]
    fn test_quantization() {
        let mut c = Canvas::new(1, 1, RenderMode::Ascii, ColorMode::TrueColor);
        c.color_quant = 16;
        assert_eq!(c.map_color(7, 9, 250), Color::Rgb { r: 0, g: 16, b: 255 });
    }
}
