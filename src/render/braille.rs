use super::canvas::{Canvas, ColorMode, color_to_fg};
use std::fmt::Write as _;

const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for each pixel of a 2x4 braille cell, indexed `[y][x]`.
const DOT_BITS: [[u32; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Pixels dimmer than this leave their dot unraised.
const DOT_THRESHOLD: f64 = 0.3;

/// Raised dots of one cell plus the average color of those dots.
fn cell(canvas: &Canvas, col: usize, row: usize) -> (u32, Option<(u8, u8, u8)>) {
    let mut bits = 0;
    let mut sum = [0u32; 3];
    let mut lit = 0u32;
    for (dy, line) in DOT_BITS.iter().enumerate() {
        for (dx, bit) in line.iter().enumerate() {
            let (x, y) = (col * 2 + dx, row * 4 + dy);
            if x >= canvas.width || y >= canvas.height {
                continue;
            }
            let idx = y * canvas.width + x;
            if canvas.pixels[idx] > DOT_THRESHOLD {
                bits |= bit;
                let (r, g, b) = canvas.colors[idx];
                sum[0] += r as u32;
                sum[1] += g as u32;
                sum[2] += b as u32;
                lit += 1;
            }
        }
    }
    let color = (lit > 0).then(|| ((sum[0] / lit) as u8, (sum[1] / lit) as u8, (sum[2] / lit) as u8));
    (bits, color)
}

pub fn render(canvas: &Canvas) -> String {
    let cols = canvas.width / 2;
    let rows = canvas.height / 4;
    let colored = canvas.color_mode != ColorMode::Mono;
    let mut out = String::with_capacity(cols * rows * 20);

    for row in 0..rows {
        for col in 0..cols {
            let (bits, color) = cell(canvas, col, row);
            let ch = char::from_u32(BRAILLE_BASE + bits).unwrap_or(' ');
            match color {
                Some((r, g, b)) if colored => {
                    let _ = write!(out, "\x1b[{}m{ch}", color_to_fg(canvas.map_color(r, g, b)));
                }
                _ => out.push(ch),
            }
        }
        if colored {
            out.push_str("\x1b[0m");
        }
        let _ = write!(out, "\x1b[{};1H", row + 2);
    }
    out
}
