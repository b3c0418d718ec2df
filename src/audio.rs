use crate::config::AudioConfig;
use crate::error::AudioError;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Sounds the show can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueId {
    /// One countdown second
    Tick,
    /// Countdown reached zero
    Celebration,
    /// Music under the fireworks display
    Background,
}

impl CueId {
    pub const ALL: [CueId; 3] = [CueId::Tick, CueId::Celebration, CueId::Background];

    fn file_name(self, cfg: &AudioConfig) -> &str {
        match self {
            CueId::Tick => &cfg.tick,
            CueId::Celebration => &cfg.celebration,
            CueId::Background => &cfg.background,
        }
    }
}

/// Fire-and-forget sound output. Implementations must never block the tick
/// and must treat unavailable cues as no-ops.
pub trait AudioCue {
    fn play_once(&mut self, cue: CueId);
    fn play_loop(&mut self, cue: CueId);
}

/// Audio disabled.
pub struct Silent;

impl AudioCue for Silent {
    fn play_once(&mut self, _cue: CueId) {}
    fn play_loop(&mut self, _cue: CueId) {}
}

/// A sound file decoded into memory.
#[derive(Debug, Clone)]
pub struct Clip {
    channels: u16,
    sample_rate: u32,
    samples: Vec<i16>,
}

impl Clip {
    pub fn decode(path: &Path) -> Result<Self, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let (channels, sample_rate) = (decoder.channels(), decoder.sample_rate());
        let samples: Vec<i16> = decoder.collect();
        if samples.is_empty() {
            return Err(AudioError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Clip {
            channels,
            sample_rate,
            samples,
        })
    }

    fn source(&self) -> SamplesBuffer<i16> {
        SamplesBuffer::new(self.channels, self.sample_rate, self.samples.clone())
    }
}

/// Sounds decoded before the show starts. Cues whose file is missing or
/// unreadable are simply absent.
#[derive(Debug, Clone, Default)]
pub struct SoundAssets {
    clips: HashMap<CueId, Clip>,
}

impl SoundAssets {
    pub fn resolve(cfg: &AudioConfig) -> Self {
        let mut clips = HashMap::new();
        let dir = cfg.dir.clone().unwrap_or_default();
        for cue in CueId::ALL {
            let path = dir.join(cue.file_name(cfg));
            match Clip::decode(&path) {
                Ok(clip) => {
                    log::info!("audio: {cue:?} -> {}", path.display());
                    clips.insert(cue, clip);
                }
                Err(e) => log::warn!("audio: {e}; {cue:?} cue disabled"),
            }
        }
        SoundAssets { clips }
    }

    pub fn get(&self, cue: CueId) -> Option<&Clip> {
        self.clips.get(&cue)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Plays cues on the default output device.
pub struct RodioPlayer {
    // Dropping the stream closes the device
    _stream: OutputStream,
    handle: OutputStreamHandle,
    assets: SoundAssets,
    background: Option<Sink>,
}

impl RodioPlayer {
    pub fn open(assets: SoundAssets) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(RodioPlayer {
            _stream: stream,
            handle,
            assets,
            background: None,
        })
    }

    fn disable(&mut self, cue: CueId, err: AudioError) {
        log::warn!("audio: {err}; {cue:?} cue disabled");
        self.assets.clips.remove(&cue);
    }
}

impl AudioCue for RodioPlayer {
    fn play_once(&mut self, cue: CueId) {
        let Some(clip) = self.assets.get(cue) else {
            return;
        };
        if let Err(e) = self.handle.play_raw(clip.source().convert_samples()) {
            self.disable(cue, e.into());
        }
    }

    fn play_loop(&mut self, cue: CueId) {
        if self.background.is_some() {
            return;
        }
        let Some(clip) = self.assets.get(cue) else {
            return;
        };
        let source = clip.source().repeat_infinite();
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(source);
                self.background = Some(sink);
            }
            Err(e) => self.disable(cue, e.into()),
        }
    }
}

/// Pick the audio backend for this run. Anything missing degrades to silence.
pub fn from_config(cfg: &AudioConfig) -> Box<dyn AudioCue> {
    if !cfg.enabled {
        log::info!("audio: disabled");
        return Box::new(Silent);
    }
    let assets = SoundAssets::resolve(cfg);
    if assets.is_empty() {
        return Box::new(Silent);
    }
    match RodioPlayer::open(assets) {
        Ok(player) => Box::new(player),
        Err(e) => {
            log::warn!("audio: {e}; playing silently");
            Box::new(Silent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fireshow-audio-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// 16-bit mono PCM WAV.
    fn wav(rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&(rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_decode_reads_pcm_wav() {
        let dir = temp_dir("decode");
        let path = dir.join("tick.wav");
        std::fs::write(&path, wav(8000, &[0, 1000, -1000, 500])).unwrap();
        let clip = Clip::decode(&path).unwrap();
        let src = clip.source();
        assert_eq!(src.channels(), 1);
        assert_eq!(src.sample_rate(), 8000);
        assert_eq!(clip.samples, vec![0, 1000, -1000, 500]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_resolve_skips_missing_and_undecodable_files() {
        let dir = temp_dir("resolve");
        std::fs::write(dir.join("tick.wav"), wav(8000, &[0, 200, 400])).unwrap();
        std::fs::write(dir.join("celebration.wav"), b"RIFF not really").unwrap();
        let cfg = AudioConfig {
            dir: Some(dir.clone()),
            ..AudioConfig::default()
        };
        let assets = SoundAssets::resolve(&cfg);
        assert!(assets.get(CueId::Tick).is_some());
        assert!(assets.get(CueId::Celebration).is_none());
        assert!(assets.get(CueId::Background).is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_silent_wav_is_rejected() {
        let dir = temp_dir("empty");
        let path = dir.join("background.wav");
        std::fs::write(&path, wav(8000, &[])).unwrap();
        assert!(Clip::decode(&path).is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_assets_fall_back_to_silence() {
        let cfg = AudioConfig {
            dir: Some(PathBuf::from("/nonexistent/fireshow-sounds")),
            ..AudioConfig::default()
        };
        assert!(SoundAssets::resolve(&cfg).is_empty());
        let mut audio = from_config(&cfg);
        audio.play_once(CueId::Tick);
        audio.play_loop(CueId::Background);

        let disabled = AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        };
        let mut audio = from_config(&disabled);
        audio.play_once(CueId::Celebration);
    }
}
