use super::{Canvas, Renderer, Rgba};
use crate::config::DisplayConfig;

/// Rasterizes show primitives onto a [`Canvas`], stretching the logical
/// display to fill the canvas.
pub struct CanvasRenderer<'a> {
    canvas: &'a mut Canvas,
    sx: f64,
    sy: f64,
}

impl<'a> CanvasRenderer<'a> {
    pub fn new(canvas: &'a mut Canvas, display: DisplayConfig) -> Self {
        let sx = canvas.width as f64 / display.width;
        let sy = canvas.height as f64 / display.height;
        CanvasRenderer { canvas, sx, sy }
    }

    fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.sx, y * self.sy)
    }
}

impl Renderer for CanvasRenderer<'_> {
    fn draw_disc(&mut self, center: (f64, f64), radius: f64, (r, g, b, a): Rgba) {
        if a == 0 {
            return;
        }
        let brightness = a as f64 / 255.0;
        let (cx, cy) = self.to_pixel(center);
        let (rx, ry) = ((radius * self.sx).max(0.0), (radius * self.sy).max(0.0));

        // Discs smaller than a pixel still light the pixel they sit in.
        if cx >= 0.0 && cy >= 0.0 {
            self.canvas.blend(cx as usize, cy as usize, brightness, (r, g, b));
        }
        if rx < 0.5 && ry < 0.5 {
            return;
        }

        let x0 = (cx - rx).floor().max(0.0) as usize;
        let y0 = (cy - ry).floor().max(0.0) as usize;
        let x1 = ((cx + rx).ceil().max(0.0) as usize).min(self.canvas.width);
        let y1 = ((cy + ry).ceil().max(0.0) as usize).min(self.canvas.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = (px as f64 + 0.5 - cx) / rx.max(0.5);
                let dy = (py as f64 + 0.5 - cy) / ry.max(0.5);
                if dx * dx + dy * dy <= 1.0 {
                    self.canvas.blend(px, py, brightness, (r, g, b));
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, center: (f64, f64), (r, g, b, a): Rgba, (or, og, ob, _): Rgba) {
        if a == 0 || text.is_empty() {
            return;
        }
        let (px, py) = self.to_pixel(center);
        if px < 0.0 || py < 0.0 {
            return;
        }
        self.canvas.put_text(px as usize, py as usize, text, (r, g, b), Some((or, og, ob)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ColorMode, RenderMode};

    fn canvas() -> Canvas {
        // 80x60 pixels for an 800x600 display: one pixel per 10 units
        Canvas::new(80, 60, RenderMode::Ascii, ColorMode::TrueColor)
    }

    fn lit(c: &Canvas) -> usize {
        c.pixels.iter().filter(|&&v| v > 0.0).count()
    }

    #[test]
    fn test_tiny_disc_lights_its_pixel() {
        let mut c = canvas();
        CanvasRenderer::new(&mut c, DisplayConfig::default()).draw_disc((405.0, 305.0), 1.0, (255, 0, 0, 255));
        assert_eq!(lit(&c), 1);
        assert_eq!(c.pixels[30 * 80 + 40], 1.0);
        assert_eq!(c.colors[30 * 80 + 40], (255, 0, 0));
    }

    #[test]
    fn test_disc_area_grows_with_radius() {
        let mut small = canvas();
        CanvasRenderer::new(&mut small, DisplayConfig::default()).draw_disc((400.0, 300.0), 20.0, (255, 255, 255, 255));
        let mut big = canvas();
        CanvasRenderer::new(&mut big, DisplayConfig::default()).draw_disc((400.0, 300.0), 60.0, (255, 255, 255, 255));
        assert!(lit(&small) > 1);
        assert!(lit(&big) > lit(&small) * 4);
    }

    #[test]
    fn test_alpha_sets_brightness_and_zero_is_skipped() {
        let mut c = canvas();
        let mut r = CanvasRenderer::new(&mut c, DisplayConfig::default());
        r.draw_disc((100.0, 100.0), 1.0, (0, 0, 255, 0));
        r.draw_disc((200.0, 200.0), 1.0, (0, 0, 255, 51));
        assert_eq!(lit(&c), 1);
        assert!((c.pixels[20 * 80 + 20] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_offscreen_disc_is_clipped() {
        let mut c = canvas();
        let mut r = CanvasRenderer::new(&mut c, DisplayConfig::default());
        r.draw_disc((-50.0, -50.0), 3.0, (255, 255, 255, 255));
        r.draw_disc((900.0, 700.0), 3.0, (255, 255, 255, 255));
        r.draw_disc((-5.0, 300.0), 20.0, (255, 255, 255, 255));
        assert!(lit(&c) > 0);
        assert!((0..60).all(|y| c.pixels[y * 80 + 79] == 0.0));
    }

    #[test]
    fn test_text_centered_with_outline_backdrop() {
        let mut c = canvas();
        CanvasRenderer::new(&mut c, DisplayConfig::default()).draw_text(
            "Joy",
            (400.0, 250.0),
            (255, 200, 0, 255),
            (0, 0, 0, 255),
        );
        assert_eq!(c.overlays.len(), 1);
        let o = &c.overlays[0];
        assert_eq!((o.col, o.row), (39, 25));
        assert_eq!(o.bg, Some((0, 0, 0)));
    }
}
