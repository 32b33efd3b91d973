use crate::{AudioConfig, ConfigError};
use std::f64::consts::PI;

/// The base shape of every oscillator in a pattern. Chosen once in the config and threaded
/// through every synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorKind {
    Sine,
    #[default]
    Sawtooth,
}

impl OscillatorKind {
    pub const ALL: [Self; 2] = [Self::Sine, Self::Sawtooth];

    /// Decode the numeric `wavetype` field of the config file.
    pub fn from_wavetype(wavetype: i64) -> Result<Self, ConfigError> {
        match wavetype {
            0 => Ok(Self::Sine),
            1 => Ok(Self::Sawtooth),
            other => Err(ConfigError::Wavetype(other)),
        }
    }

    pub fn wavetype(self) -> i64 {
        match self {
            Self::Sine => 0,
            Self::Sawtooth => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "Sine",
            Self::Sawtooth => "Sawtooth",
        }
    }

    /// The value of the waveform after `phase` cycles, in -1..=1. The sawtooth is centred so
    /// that it crosses zero at every whole cycle, like the sine.
    pub fn shape(self, phase: f64) -> f64 {
        match self {
            Self::Sine => (phase * PI * 2.0).sin(),
            Self::Sawtooth => 2.0 * (phase - (0.5 + phase).floor()),
        }
    }
}

/// One sample of a steady oscillator at `freq_hz`, `index` samples after its start.
pub fn wave(
    config: &AudioConfig,
    freq_hz: f64,
    index: usize,
    halve_volume: bool,
) -> f32 {
    let t_s = index as f64 / config.sample_rate_hz as f64;
    (config.amplitude(halve_volume) * config.oscillator_kind.shape(t_s * freq_hz))
        as f32
}

/// Number of cycles completed `t_s` seconds into a linear sweep that starts at `start_hz` and
/// reaches `target_hz` after `duration_s` seconds (the integral of the instantaneous
/// frequency). `duration_s` must be positive.
pub fn chirp_phase(
    target_hz: f64,
    start_hz: f64,
    duration_s: f64,
    t_s: f64,
) -> f64 {
    start_hz * t_s + (target_hz - start_hz) * t_s * t_s / (2.0 * duration_s)
}

/// One sample of a linear frequency sweep. Note the argument order: the sweep's target comes
/// first and its origin second. `duration_s` must be positive; callers guard this when a sweep
/// is assembled rather than here.
pub fn chirp(
    config: &AudioConfig,
    target_hz: f64,
    start_hz: f64,
    duration_s: f64,
    t_s: f64,
    halve_volume: bool,
) -> f32 {
    let phase = chirp_phase(target_hz, start_hz, duration_s, t_s);
    (config.amplitude(halve_volume) * config.oscillator_kind.shape(phase)) as f32
}
