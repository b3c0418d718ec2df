use super::canvas::{Canvas, ColorMode, color_to_bg, color_to_fg};

/// Brightness under which a half-cell counts as night sky. Kept far below the
/// braille cutoff so the dim tail of a fading trail still shows as a dark glow.
const SKY_THRESHOLD: f64 = 0.02;

/// Tracks the SGR state already sent so runs of equal colors are emitted once.
#[derive(Default)]
struct Pen {
    fg: String,
    bg: String,
    active: bool,
}

impl Pen {
    fn set(&mut self, out: &mut String, fg: String, bg: String) {
        let codes = match (fg != self.fg, bg != self.bg) {
            (true, true) => format!("{fg};{bg}"),
            (true, false) => fg.clone(),
            (false, true) => bg.clone(),
            (false, false) => String::new(),
        };
        if !codes.is_empty() {
            out.push_str("\x1b[");
            out.push_str(&codes);
            out.push('m');
        }
        self.fg = fg;
        self.bg = bg;
        self.active = true;
    }

    fn reset(&mut self, out: &mut String) {
        if self.active {
            out.push_str("\x1b[0m");
            *self = Pen::default();
        }
    }
}

fn shade(rgb: (u8, u8, u8), v: f64) -> (u8, u8, u8) {
    let v = v.clamp(0.0, 1.0);
    let s = |c: u8| (c as f64 * v) as u8;
    (s(rgb.0), s(rgb.1), s(rgb.2))
}

/// One terminal cell per column, two pixels per row: the top pixel is the
/// glyph color of `▀` and the bottom pixel its background.
pub fn render(canvas: &Canvas) -> String {
    let cols = canvas.width;
    let rows = canvas.height / 2;
    let mut out = String::with_capacity(cols * rows * 10);
    let mut pen = Pen::default();

    for row in 0..rows {
        for col in 0..cols {
            let top = row * 2 * canvas.width + col;
            let bot = top + canvas.width;
            let (top_v, bot_v) = (canvas.pixels[top], canvas.pixels[bot]);
            let lit = (top_v >= SKY_THRESHOLD, bot_v >= SKY_THRESHOLD);

            if canvas.color_mode == ColorMode::Mono {
                out.push(match lit {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
                continue;
            }
            if lit == (false, false) {
                pen.reset(&mut out);
                out.push(' ');
                continue;
            }

            let (tr, tg, tb) = shade(canvas.colors[top], top_v);
            let (br, bg, bb) = shade(canvas.colors[bot], bot_v);
            let fg = color_to_fg(canvas.map_color(tr, tg, tb));
            let bg = color_to_bg(canvas.map_color(br, bg, bb));
            pen.set(&mut out, fg, bg);
            out.push('▀');
        }
        pen.reset(&mut out);
        out.push_str(&format!("\x1b[{};1H", row + 2));
    }
    out
}
