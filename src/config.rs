use crate::error::ConfigError;
use crate::render::{ColorMode, RenderMode};
use crate::show::Rgb;
use rand::RngExt;
use rand::distr::uniform::SampleUniform;
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Inclusive `{ min, max }` range read from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Span { min, max }
    }
}

impl<T: SampleUniform + PartialOrd + Copy> Span<T> {
    /// Draw a value in `min..=max`. Only valid after `check` has passed.
    pub fn sample<R: RngExt>(&self, rng: &mut R) -> T {
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, v: T) -> bool {
        v >= self.min && v <= self.max
    }
}

impl<T: PartialOrd + Display> Span<T> {
    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !matches!(self.min.partial_cmp(&self.max), Some(Ordering::Less | Ordering::Equal)) {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(())
    }
}

impl Span<f64> {
    /// Like `check`, and both ends must be finite.
    fn check_finite(&self, field: &'static str) -> Result<(), ConfigError> {
        finite(field, self.min)?;
        finite(field, self.max)?;
        self.check(field)
    }
}

impl Span<u32> {
    fn scaled(self, factor: f64) -> Self {
        Span {
            min: scale_count(self.min, factor),
            max: scale_count(self.max, factor),
        }
    }
}

/// Particles one burst may ask for.
pub const MAX_BURST: u32 = 20_000;

fn scale_count(n: u32, factor: f64) -> u32 {
    (n as f64 * factor).round().clamp(0.0, MAX_BURST as f64 * 2.0) as u32
}

/// Everything the show reads at startup. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub display: DisplayConfig,
    /// Simulation ticks (and rendered frames) per second
    pub tick_rate: u32,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
    pub render: Option<RenderModeConfig>,
    pub color: Option<ColorModeConfig>,
    /// Hide status bar
    pub clean: bool,
    /// Color quantization step (0 = off)
    pub color_quant: u8,
    /// Particle count multiplier (0.5-2.0)
    pub scale: f64,
    pub scene: SceneConfig,
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    pub palette: Vec<Rgb>,
    pub labels: Vec<String>,
    /// Label is drawn this far above the explosion point
    pub label_offset: f64,
    pub patterns: PatternConfig,
    pub audio: AudioConfig,
    pub log_file: Option<PathBuf>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        ShowConfig {
            display: DisplayConfig::default(),
            tick_rate: 30,
            seed: None,
            render: None,
            color: None,
            clean: false,
            color_quant: 0,
            scale: 1.0,
            scene: SceneConfig::default(),
            physics: PhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            palette: vec![
                (255, 120, 120),
                (120, 255, 120),
                (120, 120, 255),
                (255, 255, 120),
                (255, 120, 255),
                (120, 255, 255),
                (255, 200, 120),
            ],
            labels: vec![
                "Cheers".to_string(),
                "Joy".to_string(),
                "Hope".to_string(),
                "Luck".to_string(),
            ],
            label_offset: 40.0,
            patterns: PatternConfig::default(),
            audio: AudioConfig::default(),
            log_file: None,
        }
    }
}

/// Logical display size. The renderer scales this onto the terminal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub countdown_seconds: u32,
    pub celebration_seconds: f64,
    pub banner: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            countdown_seconds: 5,
            celebration_seconds: 2.0,
            banner: "Happy New Year!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per tick for non-exempt particles
    pub gravity: f64,
    /// Fireworks explode once they climb to this fraction of the display height
    pub explode_at: f64,
    /// Fraction of canvas brightness removed each frame (1.0 clears every frame)
    pub trail_fade: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 0.1,
            explode_at: 0.5,
            trail_fade: 25.0 / 255.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub interval_ticks: u32,
    pub count: Span<u32>,
    /// Launch x stays at least this far from either display edge
    pub margin: f64,
    /// Upper bound on non-radial fireworks per spawn wave
    pub max_special: u32,
    pub label_probability: f64,
    /// Negative = upward
    pub ascent_velocity: Span<f64>,
    pub rocket_radius: Span<f64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            interval_ticks: 60,
            count: Span::new(1, 3),
            margin: 100.0,
            max_special: 1,
            label_probability: 0.5,
            ascent_velocity: Span::new(-10.0, -6.0),
            rocket_radius: Span::new(4.0, 8.0),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub weights: PatternWeights,
    pub radial: RadialConfig,
    pub snake: SnakeConfig,
    pub silhouette: SilhouetteConfig,
    pub rocket_trail: RocketTrailConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    pub radial: f64,
    pub snake: f64,
    pub silhouette: f64,
    pub rocket_trail: f64,
}

impl Default for PatternWeights {
    fn default() -> Self {
        PatternWeights {
            radial: 0.85,
            snake: 0.05,
            silhouette: 0.05,
            rocket_trail: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    pub count: Span<u32>,
    pub speed: Span<f64>,
    pub life: Span<i32>,
    pub size: Span<f64>,
}

impl Default for RadialConfig {
    fn default() -> Self {
        RadialConfig {
            count: Span::new(150, 300),
            speed: Span::new(3.0, 8.0),
            life: Span::new(40, 70),
            size: Span::new(1.5, 3.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Horizontal extent of the body path
    pub length: f64,
    pub amplitude: f64,
    /// Full sine periods along the body
    pub waves: f64,
    pub segments: u32,
    /// Particles per body segment
    pub cluster: u32,
    /// Particles in the head cluster
    pub head_cluster: u32,
    pub jitter: f64,
    /// Max drift speed of a shape particle
    pub drift: f64,
    pub life: Span<i32>,
    pub size: Span<f64>,
    /// Alpha ramps down over only this final fraction of life
    pub fade_tail: f64,
    /// Head color; complement of the body color when unset
    pub head_color: Option<Rgb>,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        SnakeConfig {
            length: 180.0,
            amplitude: 22.0,
            waves: 1.5,
            segments: 28,
            cluster: 4,
            head_cluster: 16,
            jitter: 2.0,
            drift: 0.15,
            life: Span::new(60, 80),
            size: Span::new(1.5, 2.5),
            fade_tail: 0.25,
            head_color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SilhouetteConfig {
    pub count: Span<u32>,
    /// Multiplier on the built-in body/head/ear geometry
    pub scale: f64,
    pub drift: f64,
    pub life: Span<i32>,
    pub size: Span<f64>,
    pub fade_tail: f64,
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        SilhouetteConfig {
            count: Span::new(220, 300),
            scale: 1.0,
            drift: 0.1,
            life: Span::new(80, 110),
            size: Span::new(1.5, 2.5),
            fade_tail: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RocketTrailConfig {
    pub trail_count: Span<u32>,
    /// Vertical extent of the exhaust column below the burst point
    pub trail_length: f64,
    pub lateral_speed: f64,
    pub spray_count: Span<u32>,
    pub spray_speed: Span<f64>,
    /// Half-width of the spray cone around straight up, in degrees
    pub spray_half_angle: f64,
    pub life: Span<i32>,
    pub size: Span<f64>,
}

impl Default for RocketTrailConfig {
    fn default() -> Self {
        RocketTrailConfig {
            trail_count: Span::new(40, 70),
            trail_length: 60.0,
            lateral_speed: 0.6,
            spray_count: Span::new(25, 45),
            spray_speed: Span::new(6.0, 11.0),
            spray_half_angle: 18.0,
            life: Span::new(35, 60),
            size: Span::new(1.5, 3.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Directory the cue file names are resolved against
    pub dir: Option<PathBuf>,
    pub tick: String,
    pub celebration: String,
    pub background: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            enabled: true,
            dir: None,
            tick: "tick.wav".to_string(),
            celebration: "celebration.wav".to_string(),
            background: "background.wav".to_string(),
        }
    }
}

/// Render mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderModeConfig {
    Braille,
    HalfBlock,
    Ascii,
}

impl From<RenderModeConfig> for RenderMode {
    fn from(c: RenderModeConfig) -> Self {
        match c {
            RenderModeConfig::Braille => RenderMode::Braille,
            RenderModeConfig::HalfBlock => RenderMode::HalfBlock,
            RenderModeConfig::Ascii => RenderMode::Ascii,
        }
    }
}

/// Color mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeConfig {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl From<ColorModeConfig> for ColorMode {
    fn from(c: ColorModeConfig) -> Self {
        match c {
            ColorModeConfig::Mono => ColorMode::Mono,
            ColorModeConfig::Ansi16 => ColorMode::Ansi16,
            ColorModeConfig::Ansi256 => ColorMode::Ansi256,
            ColorModeConfig::TrueColor => ColorMode::TrueColor,
        }
    }
}

fn positive<T: PartialOrd + Default + Display>(field: &'static str, v: T) -> Result<(), ConfigError> {
    if v.partial_cmp(&T::default()) != Some(Ordering::Greater) {
        return Err(ConfigError::NonPositive {
            field,
            value: v.to_string(),
        });
    }
    Ok(())
}

fn finite(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "a finite number",
            value: v.to_string(),
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if !(v >= 0.0 && v.is_finite()) {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "[0, inf)",
            value: v.to_string(),
        });
    }
    Ok(())
}

fn burst_size(field: &'static str, n: u64) -> Result<(), ConfigError> {
    if n > u64::from(MAX_BURST) {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "at most 20000 particles per burst",
            value: n.to_string(),
        });
    }
    Ok(())
}

fn unit_interval(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if !Span::new(0.0, 1.0).contains(v) {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "[0, 1]",
            value: v.to_string(),
        });
    }
    Ok(())
}

fn fade_tail(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if !(v > 0.0 && v <= 1.0) {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "(0, 1]",
            value: v.to_string(),
        });
    }
    Ok(())
}

impl ShowConfig {
    /// Multiply every pattern particle-count range by `factor`.
    pub fn apply_scale(&mut self, factor: f64) {
        self.scale = factor;
        let p = &mut self.patterns;
        p.radial.count = p.radial.count.scaled(factor);
        p.silhouette.count = p.silhouette.count.scaled(factor);
        p.rocket_trail.trail_count = p.rocket_trail.trail_count.scaled(factor);
        p.rocket_trail.spray_count = p.rocket_trail.spray_count.scaled(factor);
        p.snake.cluster = (p.snake.cluster as f64 * factor).round().max(1.0) as u32;
        p.snake.head_cluster = (p.snake.head_cluster as f64 * factor).round().max(1.0) as u32;
    }

    /// Reject configurations the show cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("display.width", self.display.width)?;
        positive("display.width", self.display.width)?;
        finite("display.height", self.display.height)?;
        positive("display.height", self.display.height)?;
        positive("tick_rate", self.tick_rate)?;
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.labels.is_empty() {
            return Err(ConfigError::EmptyLabels);
        }
        if !Span::new(0.5, 2.0).contains(self.scale) {
            return Err(ConfigError::OutOfRange {
                field: "scale",
                expected: "[0.5, 2.0]",
                value: self.scale.to_string(),
            });
        }
        finite("label_offset", self.label_offset)?;

        if !self.scene.celebration_seconds.is_finite() || self.scene.celebration_seconds < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "scene.celebration_seconds",
                expected: "[0, inf)",
                value: self.scene.celebration_seconds.to_string(),
            });
        }

        let physics = &self.physics;
        if !(physics.explode_at > 0.0 && physics.explode_at <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "physics.explode_at",
                expected: "(0, 1]",
                value: physics.explode_at.to_string(),
            });
        }
        unit_interval("physics.trail_fade", physics.trail_fade)?;
        finite("physics.gravity", physics.gravity)?;

        let spawn = &self.spawn;
        positive("spawn.interval_ticks", spawn.interval_ticks)?;
        spawn.count.check("spawn.count")?;
        spawn.ascent_velocity.check_finite("spawn.ascent_velocity")?;
        if spawn.ascent_velocity.max >= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "spawn.ascent_velocity",
                expected: "negative values (upward)",
                value: spawn.ascent_velocity.max.to_string(),
            });
        }
        spawn.rocket_radius.check_finite("spawn.rocket_radius")?;
        unit_interval("spawn.label_probability", spawn.label_probability)?;
        if !(spawn.margin >= 0.0 && spawn.margin * 2.0 <= self.display.width) {
            return Err(ConfigError::OutOfRange {
                field: "spawn.margin",
                expected: "[0, display.width / 2]",
                value: spawn.margin.to_string(),
            });
        }

        self.validate_patterns()
    }

    fn validate_patterns(&self) -> Result<(), ConfigError> {
        let p = &self.patterns;
        let w = &p.weights;
        for (field, weight) in [
            ("patterns.weights.radial", w.radial),
            ("patterns.weights.snake", w.snake),
            ("patterns.weights.silhouette", w.silhouette),
            ("patterns.weights.rocket_trail", w.rocket_trail),
        ] {
            if weight < 0.0 || !weight.is_finite() {
                return Err(ConfigError::OutOfRange {
                    field,
                    expected: "[0, inf)",
                    value: weight.to_string(),
                });
            }
        }
        if w.radial + w.snake + w.silhouette + w.rocket_trail <= 0.0 {
            return Err(ConfigError::NoPatternWeight);
        }

        p.radial.count.check("patterns.radial.count")?;
        burst_size("patterns.radial.count", p.radial.count.max.into())?;
        p.radial.speed.check_finite("patterns.radial.speed")?;
        p.radial.life.check("patterns.radial.life")?;
        positive("patterns.radial.life.min", p.radial.life.min)?;
        p.radial.size.check_finite("patterns.radial.size")?;

        let snake = &p.snake;
        positive("patterns.snake.segments", snake.segments)?;
        burst_size(
            "patterns.snake",
            u64::from(snake.segments) * u64::from(snake.cluster) + u64::from(snake.head_cluster),
        )?;
        finite("patterns.snake.length", snake.length)?;
        finite("patterns.snake.amplitude", snake.amplitude)?;
        finite("patterns.snake.waves", snake.waves)?;
        non_negative("patterns.snake.jitter", snake.jitter)?;
        non_negative("patterns.snake.drift", snake.drift)?;
        p.snake.life.check("patterns.snake.life")?;
        positive("patterns.snake.life.min", p.snake.life.min)?;
        p.snake.size.check_finite("patterns.snake.size")?;
        fade_tail("patterns.snake.fade_tail", p.snake.fade_tail)?;

        p.silhouette.count.check("patterns.silhouette.count")?;
        burst_size("patterns.silhouette.count", p.silhouette.count.max.into())?;
        finite("patterns.silhouette.scale", p.silhouette.scale)?;
        positive("patterns.silhouette.scale", p.silhouette.scale)?;
        non_negative("patterns.silhouette.drift", p.silhouette.drift)?;
        p.silhouette.life.check("patterns.silhouette.life")?;
        positive("patterns.silhouette.life.min", p.silhouette.life.min)?;
        p.silhouette.size.check_finite("patterns.silhouette.size")?;
        fade_tail("patterns.silhouette.fade_tail", p.silhouette.fade_tail)?;

        let rt = &p.rocket_trail;
        rt.trail_count.check("patterns.rocket_trail.trail_count")?;
        rt.spray_count.check("patterns.rocket_trail.spray_count")?;
        burst_size(
            "patterns.rocket_trail",
            u64::from(rt.trail_count.max) + u64::from(rt.spray_count.max),
        )?;
        non_negative("patterns.rocket_trail.trail_length", rt.trail_length)?;
        non_negative("patterns.rocket_trail.lateral_speed", rt.lateral_speed)?;
        rt.spray_speed.check_finite("patterns.rocket_trail.spray_speed")?;
        rt.life.check("patterns.rocket_trail.life")?;
        positive("patterns.rocket_trail.life.min", rt.life.min)?;
        rt.size.check_finite("patterns.rocket_trail.size")?;
        if !(0.0..=180.0).contains(&rt.spray_half_angle) {
            return Err(ConfigError::OutOfRange {
                field: "patterns.rocket_trail.spray_half_angle",
                expected: "[0, 180] degrees",
                value: rt.spray_half_angle.to_string(),
            });
        }
        Ok(())
    }
}

/// Get the config file path: ~/.config/fireshow/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fireshow").join("config.toml"))
}

/// Parse a config document.
pub fn parse_config(contents: &str, path: &Path) -> Result<ShowConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from `explicit` if given, else from the default location.
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<ShowConfig, ConfigError> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_config(&contents, path);
    }
    let Some(path) = config_path() else {
        return Ok(ShowConfig::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_config(&contents, &path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ShowConfig::default()),
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

/// Generate a default config file with all options commented out
pub fn default_config_string() -> String {
    r#"# fireshow configuration
# Use --show-config to see the active config file path.
# CLI flags override these settings.

# Logical display size; the terminal is scaled to fit
# [display]
# width = 800.0
# height = 600.0

# Simulation ticks per second (also the frame rate)
# tick_rate = 30

# Fixed random seed (random when unset)
# seed = 42

# Render mode: braille, half-block, ascii
# render = "braille"

# Color mode: mono, ansi16, ansi256, true-color
# color = "true-color"

# Hide status bar
# clean = false

# Color quantization step (0 = off, 4/8/16 = coarser colors, less output)
# color_quant = 0

# Particle count multiplier (0.5-2.0)
# scale = 1.0

# [scene]
# countdown_seconds = 5
# celebration_seconds = 2.0
# banner = "Happy New Year!"

# [physics]
# gravity = 0.1
# explode_at = 0.5
# trail_fade = 0.098

# [spawn]
# interval_ticks = 60
# count = { min = 1, max = 3 }
# margin = 100.0
# max_special = 1
# label_probability = 0.5
# ascent_velocity = { min = -10.0, max = -6.0 }
# rocket_radius = { min = 4.0, max = 8.0 }

# palette = [[255, 120, 120], [120, 255, 120], [120, 120, 255]]
# labels = ["Cheers", "Joy", "Hope", "Luck"]
# label_offset = 40.0

# [patterns.weights]
# radial = 0.85
# snake = 0.05
# silhouette = 0.05
# rocket_trail = 0.05

# [patterns.radial]
# count = { min = 150, max = 300 }
# speed = { min = 3.0, max = 8.0 }
# life = { min = 40, max = 70 }
# size = { min = 1.5, max = 3.0 }

# [patterns.snake]
# length = 180.0
# amplitude = 22.0
# waves = 1.5
# segments = 28
# cluster = 4
# head_cluster = 16
# jitter = 2.0
# drift = 0.15
# fade_tail = 0.25
# head_color = [255, 255, 255]

# [patterns.silhouette]
# count = { min = 220, max = 300 }
# scale = 1.0
# fade_tail = 0.25

# [patterns.rocket_trail]
# trail_count = { min = 40, max = 70 }
# trail_length = 60.0
# spray_count = { min = 25, max = 45 }
# spray_speed = { min = 6.0, max = 11.0 }
# spray_half_angle = 18.0

# [audio]
# enabled = true
# dir = "/path/to/sounds"
# tick = "tick.wav"
# celebration = "celebration.wav"
# background = "background.wav"

# Write logs here (RUST_LOG filters; off when unset)
# log_file = "/tmp/fireshow.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ShowConfig, ConfigError> {
        parse_config(s, Path::new("test.toml"))
    }

    #[test]
    fn test_defaults_are_valid() {
        ShowConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_config_string_parses_to_defaults() {
        let cfg = parse(&default_config_string()).unwrap();
        assert_eq!(cfg.tick_rate, 30);
        assert_eq!(cfg.spawn.interval_ticks, 60);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let cfg = parse(
            r#"
            tick_rate = 60
            labels = ["A", "B"]

            [patterns.radial]
            count = { min = 10, max = 20 }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tick_rate, 60);
        assert_eq!(cfg.labels, vec!["A", "B"]);
        assert_eq!(cfg.patterns.radial.count, Span::new(10, 20));
        assert_eq!(cfg.patterns.radial.speed, Span::new(3.0, 8.0));
        assert_eq!(cfg.spawn.margin, 100.0);
    }

    #[test]
    fn test_palette_reads_rgb_triples() {
        let cfg = parse("palette = [[1, 2, 3], [250, 0, 9]]").unwrap();
        assert_eq!(cfg.palette, vec![(1, 2, 3), (250, 0, 9)]);
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(matches!(parse("tick_rate = \"fast\""), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_empty_palette_rejected() {
        let mut cfg = ShowConfig::default();
        cfg.palette.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_empty_labels_rejected() {
        let mut cfg = ShowConfig::default();
        cfg.labels.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyLabels)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut cfg = ShowConfig::default();
        cfg.spawn.interval_ticks = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { field: "spawn.interval_ticks", .. })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut cfg = ShowConfig::default();
        cfg.patterns.radial.speed = Span::new(8.0, 3.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedRange { field: "patterns.radial.speed", .. })
        ));
    }

    #[test]
    fn test_upward_velocity_required() {
        let mut cfg = ShowConfig::default();
        cfg.spawn.ascent_velocity = Span::new(-2.0, 1.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut cfg = ShowConfig::default();
        cfg.patterns.weights = PatternWeights {
            radial: 0.0,
            snake: 0.0,
            silhouette: 0.0,
            rocket_trail: 0.0,
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NoPatternWeight)));
    }

    #[test]
    fn test_scale_multiplies_counts() {
        let mut cfg = ShowConfig::default();
        cfg.apply_scale(0.5);
        assert_eq!(cfg.patterns.radial.count, Span::new(75, 150));
        assert_eq!(cfg.patterns.snake.head_cluster, 8);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = load_config(Some(Path::new("/nonexistent/fireshow.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_nan_explode_fraction_rejected() {
        let cfg = parse("[physics]\nexplode_at = nan").unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "physics.explode_at", .. })
        ));
    }

    #[test]
    fn test_non_finite_display_rejected() {
        let cfg = parse("[display]\nwidth = nan").unwrap();
        assert!(cfg.validate().is_err());
        let cfg = parse("[display]\nheight = inf").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_nan_in_range_rejected() {
        let cfg = parse("[patterns.radial]\nspeed = { min = nan, max = 8.0 }").unwrap();
        assert!(cfg.validate().is_err());
        let cfg = parse("[spawn]\nascent_velocity = { min = -10.0, max = nan }").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_nan_spreads_and_margin_rejected() {
        for doc in [
            "[spawn]\nmargin = nan",
            "[patterns.snake]\njitter = nan",
            "[patterns.snake]\ndrift = -1.0",
            "[patterns.silhouette]\ndrift = nan",
            "[patterns.rocket_trail]\nlateral_speed = nan",
            "[patterns.rocket_trail]\ntrail_length = inf",
            "[patterns.snake]\nfade_tail = nan",
            "scale = nan",
            "label_offset = nan",
        ] {
            let cfg = parse(doc).unwrap();
            assert!(cfg.validate().is_err(), "{doc}");
        }
    }

    #[test]
    fn test_oversized_bursts_rejected() {
        let cfg = parse("[patterns.snake]\nsegments = 4000000000\ncluster = 4000000000").unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "patterns.snake", .. })
        ));
        let cfg = parse("[patterns.radial]\ncount = { min = 1, max = 4000000000 }").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_scaling_huge_count_saturates() {
        let mut cfg = ShowConfig::default();
        cfg.patterns.radial.count = Span::new(4_000_000_000, 4_000_000_000);
        cfg.apply_scale(2.0);
        assert_eq!(cfg.patterns.radial.count.max, MAX_BURST * 2);
        assert!(cfg.validate().is_err());
    }
}
