use crate::{ConfigError, OscillatorKind};

/// Multiplier applied to frequencies to emulate a second siren port turning at a proportionally
/// different pitch. Kept as an integer pair so it can be written back exactly as it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRatio {
    pub numer: u32,
    pub denom: u32,
}

impl PortRatio {
    pub const fn new(numer: u32, denom: u32) -> Self {
        Self { numer, denom }
    }

    pub fn as_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    pub fn scale(&self, freq_hz: f64) -> f64 {
        freq_hz * self.as_f64()
    }
}

impl Default for PortRatio {
    fn default() -> Self {
        Self::new(5, 6)
    }
}

/// Everything synthesis needs to know. A snapshot of this is passed by reference to every
/// synthesis call and is never changed while a pattern is being built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioConfig {
    /// default: 44100
    pub sample_rate_hz: u32,
    /// Peak amplitude of a full-volume sample. default: 0.3
    pub volume: f64,
    /// default: 3
    pub wail_cycle_count: u32,
    /// default: 5/6
    pub port_ratio: PortRatio,
    /// default: 100.0
    pub low_freq_hz: f64,
    /// default: 800.0
    pub high_freq_hz: f64,
    /// default: 10000.0
    pub winddown_time_ms: f64,
    /// default: sawtooth
    pub oscillator_kind: OscillatorKind,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            volume: 0.3,
            wail_cycle_count: 3,
            port_ratio: PortRatio::default(),
            low_freq_hz: 100.0,
            high_freq_hz: 800.0,
            winddown_time_ms: 10000.0,
            oscillator_kind: OscillatorKind::Sawtooth,
        }
    }
}

impl AudioConfig {
    /// Amplitude of a sample, halved for streams that will later be summed with another stream.
    pub fn amplitude(&self, halve_volume: bool) -> f64 {
        if halve_volume {
            self.volume / 2.0
        } else {
            self.volume
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::SampleRate(0));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Volume(self.volume));
        }
        if self.wail_cycle_count == 0 {
            return Err(ConfigError::WailCycle(0));
        }
        if self.port_ratio.numer == 0 || self.port_ratio.denom == 0 {
            return Err(ConfigError::PortRatio {
                numer: self.port_ratio.numer as i64,
                denom: self.port_ratio.denom as i64,
            });
        }
        for (name, value) in [
            ("low_freq", self.low_freq_hz),
            ("high_freq", self.high_freq_hz),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Frequency { name, value });
            }
        }
        if !(self.winddown_time_ms >= 0.0 && self.winddown_time_ms.is_finite())
        {
            return Err(ConfigError::WinddownTime(self.winddown_time_ms));
        }
        Ok(())
    }
}
