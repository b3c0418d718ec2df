//! Fireworks simulation core: particles, burst patterns, firework lifecycle,
//! spawn scheduling, scene sequencing, and the clock that ticks them all.
//!
//! Nothing here touches the terminal or the audio device; drawing and sound
//! go through the [`crate::render::Renderer`] and [`crate::audio::AudioCue`]
//! collaborators.

pub mod clock;
pub mod firework;
pub mod label;
pub mod particle;
pub mod pattern;
pub mod scene;
pub mod scheduler;

pub use clock::SimulationClock;

pub type Rgb = (u8, u8, u8);
