use crate::audio::CueId;
use crate::config::SceneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Countdown,
    Celebration,
    FireworksDisplay,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Countdown => "countdown",
            Phase::Celebration => "celebration",
            Phase::FireworksDisplay => "fireworks",
        }
    }
}

/// Audio request emitted by a scene transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCue {
    Once(CueId),
    Loop(CueId),
}

/// Forward-only sequencer: countdown, banner, then fireworks until stopped.
#[derive(Debug, Clone)]
pub struct SceneStateMachine {
    phase: Phase,
    /// Ticks since entering `phase`, including the current one
    phase_elapsed: u64,
    tick_rate: u64,
    countdown_ticks: u64,
    celebration_ticks: u64,
    /// Last whole second announced during the countdown
    countdown_remaining: Option<u64>,
    loop_started: bool,
}

impl SceneStateMachine {
    pub fn new(cfg: &SceneConfig, tick_rate: u32) -> Self {
        let tick_rate = u64::from(tick_rate.max(1));
        SceneStateMachine {
            phase: Phase::Countdown,
            phase_elapsed: 0,
            tick_rate,
            countdown_ticks: u64::from(cfg.countdown_seconds) * tick_rate,
            celebration_ticks: (cfg.celebration_seconds * tick_rate as f64).round() as u64,
            countdown_remaining: None,
            loop_started: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whole seconds left on the countdown, as last announced.
    pub fn countdown_remaining(&self) -> Option<u64> {
        self.countdown_remaining
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("scene: {} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
        self.phase_elapsed = 0;
    }

    /// Evaluate one tick. Returns the audio cues crossing a threshold this tick.
    pub fn advance(&mut self) -> Vec<SceneCue> {
        let mut cues = Vec::new();
        self.phase_elapsed += 1;

        if self.phase == Phase::Countdown {
            let left = self.countdown_ticks.saturating_sub(self.phase_elapsed);
            let remaining = left.div_ceil(self.tick_rate);
            if self.countdown_remaining.is_none_or(|prev| remaining < prev) {
                self.countdown_remaining = Some(remaining);
                if remaining > 0 {
                    cues.push(SceneCue::Once(CueId::Tick));
                }
            }
            if remaining == 0 {
                cues.push(SceneCue::Once(CueId::Celebration));
                self.enter(Phase::Celebration);
            }
            return cues;
        }

        if self.phase == Phase::Celebration && self.phase_elapsed >= self.celebration_ticks {
            self.enter(Phase::FireworksDisplay);
            self.phase_elapsed = 1;
        }

        if self.phase == Phase::FireworksDisplay && !self.loop_started {
            self.loop_started = true;
            cues.push(SceneCue::Loop(CueId::Background));
        }
        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(countdown: u32, celebration: f64, rate: u32) -> SceneStateMachine {
        let cfg = SceneConfig {
            countdown_seconds: countdown,
            celebration_seconds: celebration,
            banner: String::new(),
        };
        SceneStateMachine::new(&cfg, rate)
    }

    #[test]
    fn test_three_second_countdown() {
        let mut scene = machine(3, 2.0, 30);
        let mut ticks = Vec::new();
        let mut transitions = 0;
        for tick in 1..=90 {
            let cues = scene.advance();
            for cue in &cues {
                match cue {
                    SceneCue::Once(CueId::Tick) => ticks.push(scene.countdown_remaining().unwrap()),
                    SceneCue::Once(CueId::Celebration) => {
                        transitions += 1;
                        assert_eq!(tick, 90);
                    }
                    other => panic!("unexpected cue {other:?}"),
                }
            }
            if tick < 90 {
                assert_eq!(scene.phase(), Phase::Countdown);
            }
        }
        assert_eq!(ticks, vec![3, 2, 1]);
        assert_eq!(transitions, 1);
        assert_eq!(scene.phase(), Phase::Celebration);
        assert_eq!(scene.countdown_remaining(), Some(0));
    }

    #[test]
    fn test_celebration_lasts_configured_ticks() {
        let mut scene = machine(1, 2.0, 10);
        for _ in 0..10 {
            scene.advance();
        }
        assert_eq!(scene.phase(), Phase::Celebration);
        for _ in 0..19 {
            scene.advance();
            assert_eq!(scene.phase(), Phase::Celebration);
        }
        let cues = scene.advance();
        assert_eq!(scene.phase(), Phase::FireworksDisplay);
        assert_eq!(cues, vec![SceneCue::Loop(CueId::Background)]);
    }

    #[test]
    fn test_background_loop_starts_once() {
        let mut scene = machine(1, 0.5, 10);
        let mut loops = 0;
        for _ in 0..5_000 {
            loops += scene
                .advance()
                .iter()
                .filter(|c| matches!(c, SceneCue::Loop(_)))
                .count();
        }
        assert_eq!(scene.phase(), Phase::FireworksDisplay);
        assert_eq!(loops, 1);
    }

    #[test]
    fn test_zero_countdown_goes_straight_to_celebration() {
        let mut scene = machine(0, 1.0, 30);
        let cues = scene.advance();
        assert_eq!(cues, vec![SceneCue::Once(CueId::Celebration)]);
        assert_eq!(scene.phase(), Phase::Celebration);
    }

    #[test]
    fn test_zero_celebration_goes_straight_to_display() {
        let mut scene = machine(0, 0.0, 30);
        scene.advance();
        let cues = scene.advance();
        assert_eq!(scene.phase(), Phase::FireworksDisplay);
        assert_eq!(cues, vec![SceneCue::Loop(CueId::Background)]);
    }

    #[test]
    fn test_phases_never_regress() {
        let mut scene = machine(2, 1.0, 5);
        let order = |p: Phase| match p {
            Phase::Countdown => 0,
            Phase::Celebration => 1,
            Phase::FireworksDisplay => 2,
        };
        let mut last = order(scene.phase());
        for _ in 0..100 {
            scene.advance();
            let now = order(scene.phase());
            assert!(now >= last);
            last = now;
        }
    }
}
