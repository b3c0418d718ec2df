//! Explosion pattern generators.
//!
//! Each generator is a plain function from a burst origin, base color and RNG
//! to a fresh particle set. `generate` dispatches on the [`PatternKind`] tag.

use super::Rgb;
use super::particle::Particle;
use crate::config::{PatternConfig, RadialConfig, RocketTrailConfig, SilhouetteConfig, SnakeConfig};
use rand::RngExt;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Radial,
    Snake,
    Silhouette,
    RocketTrail,
}

impl PatternKind {
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Radial,
        PatternKind::Snake,
        PatternKind::Silhouette,
        PatternKind::RocketTrail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Radial => "radial",
            PatternKind::Snake => "snake",
            PatternKind::Silhouette => "silhouette",
            PatternKind::RocketTrail => "rocket-trail",
        }
    }
}

/// Build the particle set for a burst of `kind` at `origin`.
pub fn generate<R: RngExt>(
    kind: PatternKind,
    origin: (f64, f64),
    color: Rgb,
    cfg: &PatternConfig,
    rng: &mut R,
) -> Vec<Particle> {
    match kind {
        PatternKind::Radial => radial(origin, color, &cfg.radial, rng),
        PatternKind::Snake => snake(origin, color, &cfg.snake, rng),
        PatternKind::Silhouette => silhouette(origin, color, &cfg.silhouette, rng),
        PatternKind::RocketTrail => rocket_trail(origin, color, &cfg.rocket_trail, rng),
    }
}

/// Symmetric burst: uniform angle, uniform speed, gravity applies.
pub fn radial<R: RngExt>(origin: (f64, f64), color: Rgb, cfg: &RadialConfig, rng: &mut R) -> Vec<Particle> {
    let (x, y) = origin;
    let count = cfg.count.sample(rng) as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let angle = rng.random_range(0.0..TAU);
        let speed = cfg.speed.sample(rng);
        out.push(Particle::new(
            x,
            y,
            speed * angle.cos(),
            speed * angle.sin(),
            color,
            cfg.size.sample(rng),
            cfg.life.sample(rng),
        ));
    }
    out
}

/// Complementary color, used for the snake's head.
fn contrast(c: Rgb) -> Rgb {
    (255 - c.0, 255 - c.1, 255 - c.2)
}

fn drift<R: RngExt>(rng: &mut R, max: f64) -> (f64, f64) {
    if max <= 0.0 {
        return (0.0, 0.0);
    }
    (rng.random_range(-max..=max), rng.random_range(-max..=max))
}

/// Point on the snake's body path, `t` in 0.0..=1.0 from tail to head.
fn snake_point(origin: (f64, f64), cfg: &SnakeConfig, t: f64) -> (f64, f64) {
    let x = origin.0 - cfg.length / 2.0 + t * cfg.length;
    let y = origin.1 + cfg.amplitude * (t * cfg.waves * TAU).sin();
    (x, y)
}

/// Sinuous body of small gravity-exempt clusters with a denser,
/// contrasting head at the end of the path.
pub fn snake<R: RngExt>(origin: (f64, f64), color: Rgb, cfg: &SnakeConfig, rng: &mut R) -> Vec<Particle> {
    let segments = cfg.segments.max(1);
    let head_color = cfg.head_color.unwrap_or_else(|| contrast(color));
    let mut out = Vec::with_capacity(segments.saturating_mul(cfg.cluster).saturating_add(cfg.head_cluster) as usize);

    let cluster = |out: &mut Vec<Particle>, at: (f64, f64), n: u32, spread: f64, c: Rgb, rng: &mut R| {
        for _ in 0..n {
            let (jx, jy) = drift(rng, spread);
            let (vx, vy) = drift(rng, cfg.drift);
            out.push(
                Particle::new(at.0 + jx, at.1 + jy, vx, vy, c, cfg.size.sample(rng), cfg.life.sample(rng))
                    .holding(cfg.fade_tail),
            );
        }
    };

    for i in 0..segments {
        let t = if segments == 1 {
            0.0
        } else {
            i as f64 / (segments - 1) as f64
        };
        cluster(&mut out, snake_point(origin, cfg, t), cfg.cluster, cfg.jitter, color, rng);
    }
    let head = snake_point(origin, cfg, 1.0);
    cluster(&mut out, head, cfg.head_cluster, cfg.jitter * 2.0, head_color, rng);
    out
}

/// Elliptical region of the silhouette, in local units before scaling.
#[derive(Debug, Clone, Copy)]
struct Region {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl Region {
    fn area(&self) -> f64 {
        PI * self.rx * self.ry
    }

    /// Uniform sample inside the ellipse.
    fn sample<R: RngExt>(&self, rng: &mut R) -> (f64, f64) {
        let r = rng.random_range(0.0..=1.0f64).sqrt();
        let a = rng.random_range(0.0..TAU);
        (self.cx + self.rx * r * a.cos(), self.cy + self.ry * r * a.sin())
    }
}

/// Body ellipse, head to one side, two ears above the head. `facing` is
/// +1.0 or -1.0 and mirrors the figure horizontally.
fn silhouette_regions(scale: f64, facing: f64) -> [Region; 4] {
    let head_x = 44.0 * facing;
    let head_y = -22.0;
    let region = |cx: f64, cy: f64, rx: f64, ry: f64| Region {
        cx: cx * scale,
        cy: cy * scale,
        rx: rx * scale,
        ry: ry * scale,
    };
    [
        region(0.0, 0.0, 40.0, 24.0),
        region(head_x, head_y, 16.0, 16.0),
        region(head_x - 8.0, head_y - 18.0, 5.0, 8.0),
        region(head_x + 8.0, head_y - 18.0, 5.0, 8.0),
    ]
}

/// Simple animal figure: particles spread uniformly by area over the
/// body, head and ear regions. All hold formation.
pub fn silhouette<R: RngExt>(origin: (f64, f64), color: Rgb, cfg: &SilhouetteConfig, rng: &mut R) -> Vec<Particle> {
    let facing = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let regions = silhouette_regions(cfg.scale, facing);
    let total_area: f64 = regions.iter().map(Region::area).sum();
    let count = cfg.count.sample(rng) as usize;
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        let mut pick = rng.random_range(0.0..total_area);
        let mut region = regions[0];
        for r in &regions {
            if pick < r.area() {
                region = *r;
                break;
            }
            pick -= r.area();
        }
        let (lx, ly) = region.sample(rng);
        let (vx, vy) = drift(rng, cfg.drift);
        out.push(
            Particle::new(
                origin.0 + lx,
                origin.1 + ly,
                vx,
                vy,
                color,
                cfg.size.sample(rng),
                cfg.life.sample(rng),
            )
            .holding(cfg.fade_tail),
        );
    }
    out
}

/// Climbing exhaust column below the burst plus a narrow, fast spray
/// upward. Gravity applies to both.
pub fn rocket_trail<R: RngExt>(
    origin: (f64, f64),
    color: Rgb,
    cfg: &RocketTrailConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let (x, y) = origin;
    let trail = cfg.trail_count.sample(rng) as usize;
    let spray = cfg.spray_count.sample(rng) as usize;
    let mut out = Vec::with_capacity(trail + spray);

    for _ in 0..trail {
        let dy = if cfg.trail_length > 0.0 {
            rng.random_range(0.0..=cfg.trail_length)
        } else {
            0.0
        };
        let (vx, vy) = drift(rng, cfg.lateral_speed);
        out.push(Particle::new(
            x + rng.random_range(-1.0..=1.0),
            y + dy,
            vx,
            vy,
            color,
            cfg.size.sample(rng),
            cfg.life.sample(rng),
        ));
    }

    let half = cfg.spray_half_angle.to_radians();
    for _ in 0..spray {
        let angle = -FRAC_PI_2 + rng.random_range(-half..=half);
        let speed = cfg.spray_speed.sample(rng);
        out.push(Particle::new(
            x,
            y,
            speed * angle.cos(),
            speed * angle.sin(),
            color,
            cfg.size.sample(rng),
            cfg.life.sample(rng),
        ));
    }
    out
}
