use crate::{AudioConfig, SynthError, chirp, wave};

/// Number of samples in a timed segment (sweep or tone) lasting `duration_ms`. Ties round to
/// even. Non-positive durations have no samples.
pub fn timed_len(sample_rate_hz: u32, duration_ms: f64) -> usize {
    (sample_rate_hz as f64 / 1000.0 * duration_ms).round_ties_even() as usize
}

/// Number of samples in a stretch of silence lasting `duration_ms`. This multiplies in a
/// different order to `timed_len` so the two can disagree by a sample in rare rounding cases.
pub fn silence_len(sample_rate_hz: u32, duration_ms: f64) -> usize {
    (duration_ms / 1000.0 * sample_rate_hz as f64).round_ties_even() as usize
}

/// A timed building block of a pattern. Every sample of a segment is a pure function of the
/// config and the sample's index, so segments can be rendered straight into a slice of a larger
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A linear frequency sweep. Windups and winddowns are both sweeps; the direction comes
    /// entirely from which frequency is `from_hz` and which is `to_hz`.
    Sweep {
        from_hz: f64,
        to_hz: f64,
        duration_ms: f64,
        halve_volume: bool,
    },
    /// A steady tone, also used for alert bursts and the notes of jingles.
    Tone {
        freq_hz: f64,
        duration_ms: f64,
        halve_volume: bool,
    },
    Silence { duration_ms: f64 },
}

impl Segment {
    pub fn windup(from_hz: f64, to_hz: f64, duration_ms: f64) -> Self {
        Self::Sweep {
            from_hz,
            to_hz,
            duration_ms,
            halve_volume: false,
        }
    }

    /// Same as `windup`; the name only documents the caller's intent.
    pub fn winddown(from_hz: f64, to_hz: f64, duration_ms: f64) -> Self {
        Self::windup(from_hz, to_hz, duration_ms)
    }

    pub fn tone(duration_ms: f64, freq_hz: f64, halve_volume: bool) -> Self {
        Self::Tone {
            freq_hz,
            duration_ms,
            halve_volume,
        }
    }

    pub fn silence(duration_ms: f64) -> Self {
        Self::Silence { duration_ms }
    }

    /// The same segment at half volume.
    pub fn halved(self) -> Self {
        match self {
            Self::Sweep {
                from_hz,
                to_hz,
                duration_ms,
                ..
            } => Self::Sweep {
                from_hz,
                to_hz,
                duration_ms,
                halve_volume: true,
            },
            Self::Tone {
                freq_hz,
                duration_ms,
                ..
            } => Self::Tone {
                freq_hz,
                duration_ms,
                halve_volume: true,
            },
            quiet @ Self::Silence { .. } => quiet,
        }
    }

    /// The same segment with every frequency multiplied by `ratio`. Durations and volume are
    /// unchanged so the result always has the same length as `self`.
    pub fn scaled(self, ratio: f64) -> Self {
        match self {
            Self::Sweep {
                from_hz,
                to_hz,
                duration_ms,
                halve_volume,
            } => Self::Sweep {
                from_hz: from_hz * ratio,
                to_hz: to_hz * ratio,
                duration_ms,
                halve_volume,
            },
            Self::Tone {
                freq_hz,
                duration_ms,
                halve_volume,
            } => Self::Tone {
                freq_hz: freq_hz * ratio,
                duration_ms,
                halve_volume,
            },
            quiet @ Self::Silence { .. } => quiet,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        match *self {
            Self::Sweep { duration_ms, .. }
            | Self::Tone { duration_ms, .. }
            | Self::Silence { duration_ms } => duration_ms,
        }
    }

    pub fn num_samples(&self, config: &AudioConfig) -> usize {
        match *self {
            Self::Sweep { duration_ms, .. } | Self::Tone { duration_ms, .. } => {
                timed_len(config.sample_rate_hz, duration_ms)
            }
            Self::Silence { duration_ms } => {
                silence_len(config.sample_rate_hz, duration_ms)
            }
        }
    }

    /// Sweeps divide by their duration so one with a non-positive duration must never be asked
    /// for a sample. Call this when a segment is added to a pattern.
    pub fn check(&self) -> Result<(), SynthError> {
        match *self {
            Self::Sweep {
                from_hz,
                to_hz,
                duration_ms,
                ..
            } if duration_ms.is_nan() || duration_ms < 0.0 => {
                Err(SynthError::SweepDuration {
                    from_hz,
                    to_hz,
                    duration_ms,
                })
            }
            _ => Ok(()),
        }
    }

    /// The sample at `index`. For sweeps this must only be called with an index below
    /// `num_samples`, which guarantees a positive duration.
    pub fn sample(&self, config: &AudioConfig, index: usize) -> f32 {
        match *self {
            Self::Sweep {
                from_hz,
                to_hz,
                duration_ms,
                halve_volume,
            } => {
                let t_s = index as f64 / config.sample_rate_hz as f64;
                chirp(
                    config,
                    to_hz,
                    from_hz,
                    duration_ms / 1000.0,
                    t_s,
                    halve_volume,
                )
            }
            Self::Tone {
                freq_hz,
                halve_volume,
                ..
            } => wave(config, freq_hz, index, halve_volume),
            Self::Silence { .. } => 0.0,
        }
    }

    /// Fill `out` with the segment. `out` must be exactly `num_samples` long.
    pub fn render_into(&self, config: &AudioConfig, out: &mut [f32]) {
        assert_eq!(out.len(), self.num_samples(config));
        if let Self::Silence { .. } = self {
            out.fill(0.0);
            return;
        }
        for (index, sample) in out.iter_mut().enumerate() {
            *sample = self.sample(config, index);
        }
    }

    pub fn render(&self, config: &AudioConfig) -> Vec<f32> {
        let mut out = vec![0.0; self.num_samples(config)];
        self.render_into(config, &mut out);
        out
    }
}

/// A full-volume sweep from `from_hz` to `to_hz` lasting `over_ms`.
pub fn windup(
    config: &AudioConfig,
    from_hz: f64,
    to_hz: f64,
    over_ms: f64,
) -> Vec<f32> {
    Segment::windup(from_hz, to_hz, over_ms).render(config)
}

/// Identical to `windup`. Pass the higher frequency as `from_hz` to wind down.
pub fn winddown(
    config: &AudioConfig,
    from_hz: f64,
    to_hz: f64,
    over_ms: f64,
) -> Vec<f32> {
    windup(config, from_hz, to_hz, over_ms)
}

pub fn steady_tone(
    config: &AudioConfig,
    duration_ms: f64,
    freq_hz: f64,
    halve_volume: bool,
) -> Vec<f32> {
    Segment::tone(duration_ms, freq_hz, halve_volume).render(config)
}

pub fn silence(config: &AudioConfig, duration_ms: f64) -> Vec<f32> {
    Segment::silence(duration_ms).render(config)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{OscillatorKind, chirp_phase};

    fn sine_config() -> AudioConfig {
        AudioConfig {
            oscillator_kind: OscillatorKind::Sine,
            ..Default::default()
        }
    }

    #[test]
    fn one_second_at_44100() {
        let config = AudioConfig::default();
        assert_eq!(steady_tone(&config, 1000.0, 800.0, false).len(), 44100);
        assert_eq!(windup(&config, 100.0, 800.0, 1000.0).len(), 44100);
        assert_eq!(winddown(&config, 800.0, 100.0, 1000.0).len(), 44100);
        assert_eq!(silence(&config, 1000.0).len(), 44100);
    }

    #[test]
    fn lengths_are_rounded_sample_counts() {
        let config = AudioConfig {
            sample_rate_hz: 22050,
            ..Default::default()
        };
        for duration_ms in [0.0, 1.0, 3.0, 750.0, 1500.0, 3000.0, 10000.0] {
            let expected = (22050.0_f64 / 1000.0 * duration_ms)
                .round_ties_even() as usize;
            assert_eq!(windup(&config, 100.0, 800.0, duration_ms).len(), expected);
            assert_eq!(
                steady_tone(&config, duration_ms, 800.0, true).len(),
                expected
            );
        }
        // 22.05 samples per ms
        assert_eq!(timed_len(22050, 1.0), 22);
        assert_eq!(timed_len(22050, 3.0), 66);
    }

    #[test]
    fn silence_is_all_zeros() {
        let config = AudioConfig::default();
        let samples = silence(&config, 750.0);
        assert_eq!(samples.len(), silence_len(44100, 750.0));
        assert_eq!(samples.len(), 33075);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn windup_and_winddown_share_an_implementation() {
        let config = AudioConfig::default();
        assert_eq!(
            windup(&config, 800.0, 200.0, 500.0),
            winddown(&config, 800.0, 200.0, 500.0)
        );
    }

    #[test]
    fn windup_passes_target_first() {
        let config = sine_config();
        let samples = windup(&config, 100.0, 800.0, 1000.0);
        let i = 30000;
        let t_s = i as f64 / 44100.0;
        let expected = 0.3
            * (2.0 * std::f64::consts::PI * chirp_phase(800.0, 100.0, 1.0, t_s))
                .sin();
        assert!((samples[i] - expected as f32).abs() < 1e-5);
    }

    #[test]
    fn scaled_keeps_length_and_volume() {
        let config = AudioConfig::default();
        let segment = Segment::tone(123.0, 800.0, true);
        let scaled = segment.scaled(5.0 / 6.0);
        assert_eq!(segment.num_samples(&config), scaled.num_samples(&config));
        assert_eq!(scaled, Segment::tone(123.0, 800.0 * 5.0 / 6.0, true));
        assert_eq!(Segment::silence(10.0).scaled(2.0), Segment::silence(10.0));
    }

    #[test]
    fn halved_sweep_never_exceeds_half_volume() {
        let config = AudioConfig::default();
        let samples = Segment::windup(100.0, 800.0, 200.0).halved().render(&config);
        assert!(samples.iter().all(|s| s.abs() <= 0.15 + 1e-6));
    }

    #[test]
    fn negative_sweep_duration_is_rejected() {
        assert!(Segment::winddown(800.0, 100.0, -1.0).check().is_err());
        assert!(Segment::winddown(800.0, 100.0, 0.0).check().is_ok());
        assert!(Segment::tone(-1.0, 800.0, false).check().is_ok());
    }
}
