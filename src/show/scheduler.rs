use super::Rgb;
use super::firework::Firework;
use super::pattern::PatternKind;
use crate::config::{DisplayConfig, PatternWeights, SpawnConfig};
use rand::RngExt;

/// Launches waves of fireworks from the bottom edge on a fixed tick interval.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    cfg: SpawnConfig,
    weights: PatternWeights,
    palette: Vec<Rgb>,
    width: f64,
    launch_y: f64,
    ticks: u64,
}

fn weight(w: &PatternWeights, kind: PatternKind) -> f64 {
    match kind {
        PatternKind::Radial => w.radial,
        PatternKind::Snake => w.snake,
        PatternKind::Silhouette => w.silhouette,
        PatternKind::RocketTrail => w.rocket_trail,
    }
}

impl SpawnScheduler {
    pub fn new(cfg: SpawnConfig, weights: PatternWeights, palette: Vec<Rgb>, display: DisplayConfig) -> Self {
        SpawnScheduler {
            cfg,
            weights,
            palette,
            width: display.width,
            launch_y: display.height,
            ticks: 0,
        }
    }

    fn pick_pattern<R: RngExt>(&self, rng: &mut R) -> PatternKind {
        let table = PatternKind::ALL.map(|kind| (kind, weight(&self.weights, kind)));
        let total: f64 = table.iter().map(|(_, w)| w).sum();
        let mut pick = rng.random_range(0.0..total);
        for (kind, weight) in table {
            if pick < weight {
                return kind;
            }
            pick -= weight;
        }
        PatternKind::Radial
    }

    /// Advance one tick of the display phase. Returns the fireworks launched
    /// on this tick, usually none.
    pub fn tick<R: RngExt>(&mut self, rng: &mut R) -> Vec<Firework> {
        self.ticks += 1;
        if self.ticks % u64::from(self.cfg.interval_ticks) != 0 {
            return Vec::new();
        }

        let count = self.cfg.count.sample(rng);
        let mut specials = 0;
        let mut wave = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let x = rng.random_range(self.cfg.margin..=self.width - self.cfg.margin);
            let mut pattern = self.pick_pattern(rng);
            if pattern != PatternKind::Radial {
                if specials >= self.cfg.max_special {
                    pattern = PatternKind::Radial;
                } else {
                    specials += 1;
                }
            }
            let labelled = pattern == PatternKind::Radial && rng.random_bool(self.cfg.label_probability);
            let color = self.palette[rng.random_range(0..self.palette.len())];

            let fw = Firework::launch(x, self.launch_y, self.cfg.ascent_velocity.sample(rng), pattern, color)
                .with_rocket_radius(self.cfg.rocket_radius.sample(rng))
                .with_label(labelled);
            log::debug!("launch {} at x={:.0} label={}", pattern.name(), x, labelled);
            wave.push(fw);
        }
        wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShowConfig, Span};
    use crate::show::firework::FireworkState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scheduler(cfg: &ShowConfig) -> SpawnScheduler {
        SpawnScheduler::new(cfg.spawn, cfg.patterns.weights, cfg.palette.clone(), cfg.display)
    }

    #[test]
    fn test_fires_only_on_interval() {
        let cfg = ShowConfig::default();
        let mut s = scheduler(&cfg);
        let mut rng = StdRng::seed_from_u64(1);
        for tick in 1..=600u64 {
            let wave = s.tick(&mut rng);
            if tick % 60 == 0 {
                assert!(cfg.spawn.count.contains(wave.len() as u32));
            } else {
                assert!(wave.is_empty(), "tick {tick}");
            }
        }
    }

    #[test]
    fn test_launch_parameters_within_config() {
        let cfg = ShowConfig::default();
        let mut s = scheduler(&cfg);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..6000 {
            for fw in s.tick(&mut rng) {
                assert_eq!(fw.state, FireworkState::Ascending);
                assert!(fw.x >= 100.0 && fw.x <= 700.0);
                assert_eq!(fw.y, 600.0);
                assert!(cfg.spawn.ascent_velocity.contains(fw.ascent_velocity));
                assert!(cfg.palette.contains(&fw.color));
                assert!(fw.particles.is_empty());
                if fw.label_visible {
                    assert_eq!(fw.pattern, PatternKind::Radial);
                }
            }
        }
    }

    #[test]
    fn test_at_most_one_special_per_wave() {
        let mut cfg = ShowConfig::default();
        cfg.spawn.interval_ticks = 1;
        cfg.spawn.count = Span::new(5, 5);
        cfg.patterns.weights = PatternWeights {
            radial: 0.0,
            snake: 1.0,
            silhouette: 1.0,
            rocket_trail: 1.0,
        };
        let mut s = scheduler(&cfg);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let wave = s.tick(&mut rng);
            let specials = wave.iter().filter(|f| f.pattern != PatternKind::Radial).count();
            assert_eq!(wave.len(), 5);
            assert_eq!(specials, 1);
        }
    }

    #[test]
    fn test_label_probability_extremes() {
        let mut cfg = ShowConfig::default();
        cfg.spawn.interval_ticks = 1;
        cfg.patterns.weights.snake = 0.0;
        cfg.patterns.weights.silhouette = 0.0;
        cfg.patterns.weights.rocket_trail = 0.0;

        cfg.spawn.label_probability = 1.0;
        let mut s = scheduler(&cfg);
        let mut rng = StdRng::seed_from_u64(4);
        assert!((0..20).flat_map(|_| s.tick(&mut rng)).all(|f| f.label_visible));

        cfg.spawn.label_probability = 0.0;
        let mut s = scheduler(&cfg);
        assert!((0..20).flat_map(|_| s.tick(&mut rng)).all(|f| !f.label_visible));
    }

    #[test]
    fn test_weights_select_only_enabled_patterns() {
        let mut cfg = ShowConfig::default();
        cfg.spawn.interval_ticks = 1;
        cfg.spawn.max_special = 10;
        cfg.patterns.weights = PatternWeights {
            radial: 0.0,
            snake: 0.0,
            silhouette: 1.0,
            rocket_trail: 0.0,
        };
        let mut s = scheduler(&cfg);
        let mut rng = StdRng::seed_from_u64(5);
        for fw in (0..30).flat_map(|_| s.tick(&mut rng)) {
            assert_eq!(fw.pattern, PatternKind::Silhouette);
            assert!(!fw.label_visible);
        }
    }
}
