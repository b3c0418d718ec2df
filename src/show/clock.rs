use super::Rgb;
use super::firework::{Firework, FireworkState, TickContext};
use super::label::{Label, LabelRotation};
use super::scene::{Phase, SceneCue, SceneStateMachine};
use super::scheduler::SpawnScheduler;
use crate::audio::AudioCue;
use crate::config::{PatternConfig, ShowConfig};
use crate::error::ConfigError;
use crate::render::{Renderer, Rgba};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

const OUTLINE: Rgba = (0, 0, 0, 255);
const COUNTDOWN_COLOR: Rgba = (255, 255, 255, 255);
const BANNER_COLOR: Rgba = (255, 215, 0, 255);
/// Trail discs drawn below an ascending rocket
const TRAIL_STEPS: usize = 3;
const TRAIL_SPACING: f64 = 5.0;
/// Concentric discs per particle glow
const GLOW_LAYERS: usize = 3;

/// Drives one show: owns the scene, the scheduler, the active fireworks,
/// the label cursor and the RNG, and advances them one tick at a time.
pub struct SimulationClock {
    scene: SceneStateMachine,
    scheduler: SpawnScheduler,
    labels: LabelRotation,
    patterns: PatternConfig,
    fireworks: Vec<Firework>,
    rng: StdRng,
    threshold_y: f64,
    gravity: f64,
    label_offset: f64,
    center: (f64, f64),
    banner: String,
    ticks: u64,
}

impl SimulationClock {
    /// Validate `cfg` and build a clock seeded from `cfg.seed`, or randomly.
    pub fn new(cfg: &ShowConfig) -> Result<Self, ConfigError> {
        let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("show seed {seed}");
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(cfg: &ShowConfig, rng: StdRng) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(SimulationClock {
            scene: SceneStateMachine::new(&cfg.scene, cfg.tick_rate),
            scheduler: SpawnScheduler::new(cfg.spawn, cfg.patterns.weights, cfg.palette.clone(), cfg.display),
            labels: LabelRotation::new(cfg.labels.clone())?,
            patterns: cfg.patterns.clone(),
            fireworks: Vec::new(),
            rng,
            threshold_y: cfg.display.height * (1.0 - cfg.physics.explode_at),
            gravity: cfg.physics.gravity,
            label_offset: cfg.label_offset,
            center: (cfg.display.width / 2.0, cfg.display.height / 2.0),
            banner: cfg.scene.banner.clone(),
            ticks: 0,
        })
    }

    /// Run one simulation step: scene, then spawning, then every firework,
    /// then removal of spent fireworks.
    pub fn tick(&mut self, audio: &mut dyn AudioCue) {
        self.ticks += 1;

        for cue in self.scene.advance() {
            match cue {
                SceneCue::Once(id) => audio.play_once(id),
                SceneCue::Loop(id) => audio.play_loop(id),
            }
        }

        if self.scene.phase() == Phase::FireworksDisplay {
            let wave = self.scheduler.tick(&mut self.rng);
            self.fireworks.extend(wave);
        }

        let mut ctx = TickContext {
            threshold_y: self.threshold_y,
            gravity: self.gravity,
            label_offset: self.label_offset,
            patterns: &self.patterns,
            labels: &mut self.labels,
            rng: &mut self.rng,
        };
        for fw in &mut self.fireworks {
            if let Some(FireworkState::Exploding) = fw.advance(&mut ctx) {
                log::debug!(
                    "{} burst at ({:.0}, {:.0}) with {} particles",
                    fw.pattern.name(),
                    fw.x,
                    fw.y,
                    fw.particles.len()
                );
            }
        }
        self.fireworks.retain(|fw| !fw.is_spent());
    }

    /// Hand the current frame to `renderer`. Does not mutate the show.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        match self.scene.phase() {
            Phase::Countdown => {
                if let Some(n) = self.scene.countdown_remaining()
                    && n > 0
                {
                    renderer.draw_text(&n.to_string(), self.center, COUNTDOWN_COLOR, OUTLINE);
                }
            }
            Phase::Celebration => {
                renderer.draw_text(&self.banner, self.center, BANNER_COLOR, OUTLINE);
            }
            Phase::FireworksDisplay => {}
        }

        for fw in &self.fireworks {
            match fw.state {
                FireworkState::Ascending => draw_rocket(fw, renderer),
                FireworkState::Exploding => draw_burst(fw, renderer),
                FireworkState::Spent => {}
            }
        }
        for (label, (r, g, b)) in self.labels() {
            renderer.draw_text(&label.text, (label.x, label.y), (r, g, b, 255), OUTLINE);
        }
    }

    pub fn phase(&self) -> Phase {
        self.scene.phase()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    /// Labels currently on screen, each with its firework's color.
    pub fn labels(&self) -> impl Iterator<Item = (&Label, Rgb)> {
        self.fireworks.iter().filter_map(|fw| fw.label.as_ref().map(|l| (l, fw.color)))
    }

    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|fw| fw.live_particles().count()).sum()
    }
}

fn draw_rocket(fw: &Firework, renderer: &mut dyn Renderer) {
    let (r, g, b) = fw.color;
    for i in 0..TRAIL_STEPS {
        let radius = fw.rocket_radius - i as f64;
        if radius > 0.0 {
            renderer.draw_disc((fw.x, fw.y + i as f64 * TRAIL_SPACING), radius, (r, g, b, 255));
        }
    }
}

fn draw_burst(fw: &Firework, renderer: &mut dyn Renderer) {
    for p in fw.live_particles() {
        let v = p.visual_state();
        let alpha = (v.alpha * 255.0).round() as u8;
        let (r, g, b) = p.color;
        for layer in 0..GLOW_LAYERS {
            let radius = v.radius * (GLOW_LAYERS - layer) as f64 / 2.0;
            let a = alpha / (layer as u8 + 1);
            renderer.draw_disc((p.x, p.y), radius, (r, g, b, a));
        }
    }
}
