use thiserror::Error;

/// A field of the audio configuration holds a value that synthesis can't work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample_rate must be a positive number of Hz (got {0})")]
    SampleRate(i64),
    #[error("volume must be within 0.0..=1.0 (got {0})")]
    Volume(f64),
    #[error("wail_cycle must be a positive count (got {0})")]
    WailCycle(i64),
    #[error(
        "port ratio {numer}/{denom} must have a positive numerator and denominator"
    )]
    PortRatio { numer: i64, denom: i64 },
    #[error("{name} must be a positive frequency in Hz (got {value})")]
    Frequency { name: &'static str, value: f64 },
    #[error("winddown_time must be a non-negative number of ms (got {0})")]
    WinddownTime(f64),
    #[error("unknown wavetype {0} (expected 0 for sine or 1 for sawtooth)")]
    Wavetype(i64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error(
        "sweep from {from_hz} Hz to {to_hz} Hz has a non-positive duration ({duration_ms} ms)"
    )]
    SweepDuration {
        from_hz: f64,
        to_hz: f64,
        duration_ms: f64,
    },
}
