use super::Rgb;
use super::label::{Label, LabelRotation};
use super::particle::Particle;
use super::pattern::{self, PatternKind};
use crate::config::PatternConfig;
use rand::RngExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworkState {
    Ascending,
    Exploding,
    Spent,
}

/// Shared inputs a firework needs while it is advanced by the clock.
pub struct TickContext<'a, R> {
    /// Explode on the first tick `y <= threshold_y`
    pub threshold_y: f64,
    pub gravity: f64,
    /// Label sits this far above the burst
    pub label_offset: f64,
    pub patterns: &'a PatternConfig,
    pub labels: &'a mut LabelRotation,
    pub rng: &'a mut R,
}

/// A rocket that climbs, bursts into a pattern, and is spent once every
/// particle has faded.
#[derive(Debug, Clone)]
pub struct Firework {
    pub x: f64,
    pub y: f64,
    /// Per-tick change in y while ascending (negative = up)
    pub ascent_velocity: f64,
    pub state: FireworkState,
    pub pattern: PatternKind,
    pub color: Rgb,
    /// Head radius of the climbing rocket
    pub rocket_radius: f64,
    pub label_visible: bool,
    pub label: Option<Label>,
    pub particles: Vec<Particle>,
}

impl Firework {
    pub fn launch(x: f64, y: f64, ascent_velocity: f64, pattern: PatternKind, color: Rgb) -> Self {
        Firework {
            x,
            y,
            ascent_velocity,
            state: FireworkState::Ascending,
            pattern,
            color,
            rocket_radius: 4.0,
            label_visible: false,
            label: None,
            particles: Vec::new(),
        }
    }

    pub fn with_rocket_radius(mut self, radius: f64) -> Self {
        self.rocket_radius = radius;
        self
    }

    pub fn with_label(mut self, visible: bool) -> Self {
        self.label_visible = visible;
        self
    }

    pub fn is_spent(&self) -> bool {
        self.state == FireworkState::Spent
    }

    /// Advance one tick. Returns the new state when a transition happened.
    pub fn advance<R: RngExt>(&mut self, ctx: &mut TickContext<'_, R>) -> Option<FireworkState> {
        match self.state {
            FireworkState::Ascending => {
                self.y += self.ascent_velocity;
                if self.y <= ctx.threshold_y {
                    self.explode(ctx);
                    return Some(self.state);
                }
                None
            }
            FireworkState::Exploding => {
                self.particles.retain(|p| !p.is_expired());
                for p in &mut self.particles {
                    p.advance(1, ctx.gravity);
                }
                if self.particles.iter().all(Particle::is_expired) {
                    self.state = FireworkState::Spent;
                    return Some(self.state);
                }
                None
            }
            FireworkState::Spent => None,
        }
    }

    fn explode<R: RngExt>(&mut self, ctx: &mut TickContext<'_, R>) {
        debug_assert_eq!(self.state, FireworkState::Ascending);
        self.state = FireworkState::Exploding;
        self.particles = pattern::generate(self.pattern, (self.x, self.y), self.color, ctx.patterns, ctx.rng);
        if self.label_visible {
            self.label = Some(Label {
                text: ctx.labels.next_name().to_string(),
                x: self.x,
                y: self.y - ctx.label_offset,
            });
        }
    }

    pub fn live_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| !p.is_expired())
    }
}
