use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration failures. Any of these stops the show before the
/// first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("labels must contain at least one entry")]
    EmptyLabels,
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: String },
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: String,
        max: String,
    },
    #[error("{field} must lie within {expected} (got {value})")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("at least one pattern weight must be positive")]
    NoPatternWeight,
}

/// Top-level error returned from `main`.
#[derive(Debug, Error)]
pub enum ShowError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio failures. These never stop the show: the affected cue, or all of
/// audio, is disabled with a warning.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("{} holds no samples", path.display())]
    Empty { path: PathBuf },
    #[error("no audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("playback failed: {0}")]
    Play(#[from] rodio::PlayError),
}
