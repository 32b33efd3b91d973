use siren_core::{AudioConfig, SynthError, Tape};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub mod chimes;
mod recipes;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error(
        "alert duration must be from {min_s}s to {max_s}s (got {0}s)",
        min_s = AlertDuration::MIN_S,
        max_s = AlertDuration::MAX_S
    )]
    AlertDuration(f64),
    #[error("the {0} pattern needs an alert duration")]
    MissingDuration(Pattern),
    #[error("the {0} pattern doesn't take an alert duration")]
    UnexpectedDuration(Pattern),
    #[error("no pattern is called {0:?}")]
    UnknownPattern(String),
    #[error(transparent)]
    Synth(#[from] SynthError),
}

/// How long the steady part of an alert pattern lasts, as chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertDuration {
    ms: f64,
}

impl AlertDuration {
    pub const MIN_S: f64 = 0.1;
    /// Ten minutes. Longer alerts would need hundreds of megabytes of samples.
    pub const MAX_S: f64 = 600.0;

    /// Fractional seconds are allowed. The duration is truncated to whole milliseconds.
    pub fn from_secs(secs: f64) -> Result<Self, PatternError> {
        if !(Self::MIN_S..=Self::MAX_S).contains(&secs) {
            return Err(PatternError::AlertDuration(secs));
        }
        Ok(Self {
            ms: (secs * 1000.0).trunc(),
        })
    }

    pub fn ms(&self) -> f64 {
        self.ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    DualAlert,
    DualWail,
    DualFastWail,
    AlternateAlert,
    AlternateWail,
    AlternateFastWail,
    DualWhoop,
    SingleChimes,
    SingleAlert,
    SingleWail,
    SingleFastWail,
    DualChimes,
}

impl Pattern {
    /// In menu order.
    pub const ALL: [Self; 12] = [
        Self::DualAlert,
        Self::DualWail,
        Self::DualFastWail,
        Self::AlternateAlert,
        Self::AlternateWail,
        Self::AlternateFastWail,
        Self::DualWhoop,
        Self::SingleChimes,
        Self::SingleAlert,
        Self::SingleWail,
        Self::SingleFastWail,
        Self::DualChimes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DualAlert => "Dual Alert",
            Self::DualWail => "Dual Wail",
            Self::DualFastWail => "Dual Fast Wail",
            Self::AlternateAlert => "Alternate Alert",
            Self::AlternateWail => "Alternate Wail",
            Self::AlternateFastWail => "Alternate Fast Wail",
            Self::DualWhoop => "Dual Whoop",
            Self::SingleChimes => "Single Chimes",
            Self::SingleAlert => "Single Alert",
            Self::SingleWail => "Single Wail",
            Self::SingleFastWail => "Single Fast Wail",
            Self::DualChimes => "Dual Chimes",
        }
    }

    /// Whether the user chooses how long the alert lasts.
    pub fn takes_duration(self) -> bool {
        matches!(self, Self::DualAlert | Self::SingleAlert)
    }

    /// Check a user-supplied duration against whether this pattern takes one.
    pub fn duration_from_secs(
        self,
        secs: Option<f64>,
    ) -> Result<Option<AlertDuration>, PatternError> {
        match (secs, self.takes_duration()) {
            (Some(secs), true) => Ok(Some(AlertDuration::from_secs(secs)?)),
            (Some(_), false) => Err(PatternError::UnexpectedDuration(self)),
            (None, true) => Err(PatternError::MissingDuration(self)),
            (None, false) => Ok(None),
        }
    }

    /// Patterns that take long enough to synthesize that the user should be told.
    pub fn announces_generation(self) -> bool {
        matches!(
            self,
            Self::AlternateWail | Self::AlternateFastWail | Self::DualWhoop
        )
    }

    pub fn tape(
        self,
        config: &AudioConfig,
        duration: Option<AlertDuration>,
    ) -> Result<Tape, PatternError> {
        if duration.is_some() && !self.takes_duration() {
            return Err(PatternError::UnexpectedDuration(self));
        }
        let alert_ms = || {
            duration
                .map(|d| d.ms())
                .ok_or(PatternError::MissingDuration(self))
        };
        let tape = match self {
            Self::DualAlert => recipes::dual_alert(config, alert_ms()?),
            Self::DualWail => recipes::dual_wail(config),
            Self::DualFastWail => recipes::dual_fast_wail(config),
            Self::AlternateAlert => recipes::alternate_alert(config),
            Self::AlternateWail => recipes::alternate_wail(config),
            Self::AlternateFastWail => recipes::alternate_fast_wail(config),
            Self::DualWhoop => recipes::dual_whoop(config),
            Self::SingleChimes => recipes::single_chimes(),
            Self::SingleAlert => recipes::single_alert(config, alert_ms()?),
            Self::SingleWail => recipes::single_wail(config),
            Self::SingleFastWail => recipes::single_fast_wail(config),
            Self::DualChimes => recipes::dual_chimes(),
        };
        Ok(tape)
    }

    /// Build the full sample sequence for this pattern. The same pattern rendered twice with
    /// the same config gives identical samples.
    pub fn render(
        self,
        config: &AudioConfig,
        duration: Option<AlertDuration>,
    ) -> Result<Vec<f32>, PatternError> {
        let tape = self.tape(config, duration)?;
        log::debug!("rendering pattern: {}", self);
        Ok(tape.render(config)?)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl FromStr for Pattern {
    type Err = PatternError;

    /// Case-insensitive. Words may be separated by spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|pattern| normalize(pattern.name()) == wanted)
            .ok_or_else(|| PatternError::UnknownPattern(s.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use siren_core::{OscillatorKind, timed_len};

    // Low enough that rendering every pattern stays quick.
    fn small_config() -> AudioConfig {
        AudioConfig {
            sample_rate_hz: 2000,
            ..Default::default()
        }
    }

    fn duration_for(pattern: Pattern) -> Option<AlertDuration> {
        pattern
            .takes_duration()
            .then(|| AlertDuration::from_secs(1.5).unwrap())
    }

    #[test]
    fn names_round_trip() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.name().parse::<Pattern>(), Ok(pattern));
            assert_eq!(pattern.to_string(), pattern.name());
        }
    }

    #[test]
    fn parse_is_forgiving() {
        assert_eq!("dual-fast-wail".parse::<Pattern>(), Ok(Pattern::DualFastWail));
        assert_eq!("SINGLE_ALERT".parse::<Pattern>(), Ok(Pattern::SingleAlert));
        assert_eq!("  dual   chimes ".parse::<Pattern>(), Ok(Pattern::DualChimes));
        assert_eq!(
            "yelp".parse::<Pattern>(),
            Err(PatternError::UnknownPattern("yelp".to_string()))
        );
    }

    #[test]
    fn alert_duration_minimum() {
        assert_eq!(AlertDuration::from_secs(0.1).unwrap().ms(), 100.0);
        assert_eq!(AlertDuration::from_secs(2.5).unwrap().ms(), 2500.0);
        assert_eq!(AlertDuration::from_secs(1.0005).unwrap().ms(), 1000.0);
        assert_eq!(
            AlertDuration::from_secs(0.05),
            Err(PatternError::AlertDuration(0.05))
        );
        assert!(AlertDuration::from_secs(-1.0).is_err());
        assert!(AlertDuration::from_secs(f64::NAN).is_err());
        assert!(AlertDuration::from_secs(f64::INFINITY).is_err());
    }

    #[test]
    fn alert_duration_maximum() {
        assert_eq!(AlertDuration::from_secs(600.0).unwrap().ms(), 600_000.0);
        assert_eq!(
            AlertDuration::from_secs(600.5),
            Err(PatternError::AlertDuration(600.5))
        );
        assert_eq!(
            AlertDuration::from_secs(1e9),
            Err(PatternError::AlertDuration(1e9))
        );
    }

    #[test]
    fn duration_only_for_alert_patterns() {
        assert_eq!(
            Pattern::DualWail.duration_from_secs(Some(3.0)),
            Err(PatternError::UnexpectedDuration(Pattern::DualWail))
        );
        assert_eq!(Pattern::DualWail.duration_from_secs(None), Ok(None));
        assert_eq!(
            Pattern::DualAlert.duration_from_secs(None),
            Err(PatternError::MissingDuration(Pattern::DualAlert))
        );
        assert_eq!(
            Pattern::DualAlert.duration_from_secs(Some(3.0)),
            Ok(Some(AlertDuration::from_secs(3.0).unwrap()))
        );
        let duration = AlertDuration::from_secs(3.0).ok();
        assert_eq!(
            Pattern::DualWail.tape(&small_config(), duration),
            Err(PatternError::UnexpectedDuration(Pattern::DualWail))
        );
    }

    #[test]
    fn duration_patterns_require_a_duration() {
        let config = small_config();
        assert_eq!(
            Pattern::SingleAlert.render(&config, None),
            Err(PatternError::MissingDuration(Pattern::SingleAlert))
        );
        assert!(Pattern::DualWail.render(&config, None).is_ok());
    }

    #[test]
    fn every_pattern_renders_its_tape_length() {
        for kind in OscillatorKind::ALL {
            let config = AudioConfig {
                oscillator_kind: kind,
                ..small_config()
            };
            for pattern in Pattern::ALL {
                let duration = duration_for(pattern);
                let tape = pattern.tape(&config, duration).unwrap();
                let samples = pattern.render(&config, duration).unwrap();
                assert_eq!(samples.len(), tape.num_samples(&config), "{}", pattern);
                assert!(!samples.is_empty(), "{}", pattern);
                assert!(
                    samples.iter().all(|s| s.abs() <= config.volume as f32 + 1e-6),
                    "{}",
                    pattern
                );
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = small_config();
        for pattern in Pattern::ALL {
            let duration = duration_for(pattern);
            assert_eq!(
                pattern.render(&config, duration),
                pattern.render(&config, duration),
                "{}",
                pattern
            );
        }
    }

    #[test]
    fn single_alert_end_to_end() {
        let config = AudioConfig {
            low_freq_hz: 100.0,
            high_freq_hz: 800.0,
            winddown_time_ms: 10000.0,
            ..Default::default()
        };
        let duration = AlertDuration::from_secs(1.0).unwrap();
        let samples = Pattern::SingleAlert.render(&config, Some(duration)).unwrap();
        let windup = timed_len(44100, 3000.0);
        let alert = timed_len(44100, 1000.0);
        let winddown = timed_len(44100, 10000.0);
        assert_eq!(samples.len(), windup + alert + winddown);
        // the sweep starts at zero phase
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn whoop_length_matches_high_stream() {
        let config = small_config();
        // 3000ms windup + 3 cycles of (4000ms + 3000ms), then the dual winddown
        let whoop = timed_len(2000, 3000.0)
            + 3 * (timed_len(2000, 4000.0) + timed_len(2000, 3000.0));
        let expected = whoop + timed_len(2000, 10000.0);
        assert_eq!(
            Pattern::AlternateWail.render(&config, None).unwrap().len(),
            expected
        );
    }

    #[test]
    fn zero_winddown_drops_the_final_sweep() {
        let config = AudioConfig {
            winddown_time_ms: 0.0,
            ..small_config()
        };
        let samples = Pattern::SingleWail.render(&config, None).unwrap();
        let expected = timed_len(2000, 3000.0)
            + 3 * (timed_len(2000, 2000.0)
                + timed_len(2000, 4000.0)
                + timed_len(2000, 3000.0))
            + timed_len(2000, 2000.0);
        assert_eq!(samples.len(), expected);
    }
}
