//! Terminal output: a sub-cell pixel [`Canvas`] with braille, half-block and
//! ASCII encoders, and the [`Renderer`] the show draws through.

pub mod braille;
pub mod canvas;
pub mod halfblock;
pub mod painter;

pub use canvas::{Canvas, ColorMode, RenderMode};
pub use painter::CanvasRenderer;

/// Straight (non-premultiplied) color with alpha.
pub type Rgba = (u8, u8, u8, u8);

/// Drawing surface for one frame of the show, in display coordinates.
pub trait Renderer {
    /// Filled circle. Zero alpha draws nothing.
    fn draw_disc(&mut self, center: (f64, f64), radius: f64, rgba: Rgba);
    /// Text centered on `center`, drawn over an `outline` colored backdrop.
    fn draw_text(&mut self, text: &str, center: (f64, f64), rgba: Rgba, outline: Rgba);
}
