use super::Rgb;

/// How a particle's alpha falls off over its life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fade {
    /// Alpha tracks remaining life fraction.
    Linear,
    /// Fully opaque until the last `tail` fraction of life, then ramps to zero.
    /// Shape-forming bursts use this so the figure stays legible.
    LateBurst { tail: f64 },
}

/// Alpha and radius of a particle for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub alpha: f64,
    pub radius: f64,
}

/// A single decaying point owned by one exploded firework.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: Rgb,
    pub size: f64,
    /// Ticks remaining
    pub life: i32,
    /// Life at creation; `life <= total_life` always
    pub total_life: i32,
    /// Holds formation instead of falling
    pub gravity_exempt: bool,
    pub fade: Fade,
}

impl Particle {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, color: Rgb, size: f64, life: i32) -> Self {
        Particle {
            x,
            y,
            vx,
            vy,
            color,
            size,
            life,
            total_life: life,
            gravity_exempt: false,
            fade: Fade::Linear,
        }
    }

    /// Mark as a shape particle: no gravity, late fade.
    pub fn holding(mut self, tail: f64) -> Self {
        self.gravity_exempt = true;
        self.fade = Fade::LateBurst { tail };
        self
    }

    pub fn advance(&mut self, dt_ticks: i32, gravity: f64) {
        let dt = dt_ticks as f64;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        if !self.gravity_exempt {
            self.vy += gravity * dt;
        }
        self.life = self.life.saturating_sub(dt_ticks);
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life <= 0
    }

    /// Remaining life fraction (1.0 = fresh, 0.0 = expired).
    #[inline]
    pub fn life_frac(&self) -> f64 {
        if self.total_life <= 0 {
            return 0.0;
        }
        (self.life as f64 / self.total_life as f64).clamp(0.0, 1.0)
    }

    pub fn visual_state(&self) -> VisualState {
        if self.is_expired() {
            return VisualState {
                alpha: 0.0,
                radius: 0.0,
            };
        }
        let frac = self.life_frac();
        let alpha = match self.fade {
            Fade::Linear => frac,
            Fade::LateBurst { tail } if frac >= tail => 1.0,
            Fade::LateBurst { tail } => frac / tail,
        };
        VisualState {
            alpha,
            radius: (self.size * frac).max(1.0),
        }
    }
}
