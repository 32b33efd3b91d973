use crate::chimes;
use siren_core::{AudioConfig, Segment, Tape, Whoop};

const WINDUP_MS: f64 = 3000.0;
const ALERT_MS: f64 = 2000.0;
/// Wails wind down to this floor before winding back up.
const WAIL_FLOOR_HZ: f64 = 200.0;
const WAIL_WINDDOWN_MS: f64 = 4000.0;
/// Fast wails flutter this far below the high frequency.
const FLUTTER_DEPTH_HZ: f64 = 200.0;
const FLUTTER_MS: f64 = 1000.0;
const ALTERNATE_NOTE_HZ: f64 = 622.25;
const ALTERNATE_MS: f64 = 500.0;
/// Whoop patterns wind down to this rather than the configured low frequency.
const WHOOP_WINDDOWN_HZ: f64 = 100.0;
const DUAL_WHOOP_SWEEP_MS: f64 = 1500.0;
const DUAL_WHOOP_GAP_MS: f64 = 500.0;

struct Params {
    low_hz: f64,
    high_hz: f64,
    winddown_ms: f64,
    cycles: u32,
    ratio: f64,
}

impl Params {
    fn new(config: &AudioConfig) -> Self {
        Self {
            low_hz: config.low_freq_hz,
            high_hz: config.high_freq_hz,
            winddown_ms: config.winddown_time_ms,
            cycles: config.wail_cycle_count,
            ratio: config.port_ratio.as_f64(),
        }
    }
}

pub fn dual_alert(config: &AudioConfig, alert_ms: f64) -> Tape {
    let p = Params::new(config);
    let mut tape = Tape::new();
    tape.dual(Segment::windup(p.low_hz, p.high_hz, WINDUP_MS))
        .dual(Segment::tone(alert_ms, p.high_hz, false))
        .dual(Segment::winddown(p.high_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn dual_wail(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let mut tape = Tape::new();
    tape.dual(Segment::windup(p.low_hz, p.high_hz, WINDUP_MS));
    for _ in 0..p.cycles {
        tape.dual(Segment::tone(ALERT_MS, p.high_hz, false))
            .dual(Segment::winddown(p.high_hz, WAIL_FLOOR_HZ, WAIL_WINDDOWN_MS))
            .dual(Segment::windup(WAIL_FLOOR_HZ, p.high_hz, WINDUP_MS));
    }
    tape.dual(Segment::tone(ALERT_MS, p.high_hz, false))
        .dual(Segment::winddown(p.high_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn dual_fast_wail(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let flutter_hz = p.high_hz - FLUTTER_DEPTH_HZ;
    let mut tape = Tape::new();
    tape.dual(Segment::windup(p.low_hz, p.high_hz, WINDUP_MS))
        .dual(Segment::tone(ALERT_MS, p.high_hz, false));
    for _ in 0..p.cycles {
        tape.dual(Segment::winddown(p.high_hz, flutter_hz, FLUTTER_MS))
            .dual(Segment::windup(flutter_hz, p.high_hz, FLUTTER_MS));
    }
    tape.dual(Segment::tone(ALERT_MS, p.high_hz, false))
        .dual(Segment::winddown(p.high_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn alternate_alert(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let note_hz = ALTERNATE_NOTE_HZ;
    let mut tape = Tape::new();
    tape.dual(Segment::windup(p.low_hz, note_hz, WINDUP_MS))
        .dual(Segment::tone(ALTERNATE_MS, note_hz, false));
    for _ in 0..p.cycles * 2 {
        tape.single(Segment::tone(ALTERNATE_MS, note_hz, true))
            .single(Segment::tone(ALTERNATE_MS, note_hz * p.ratio, true));
    }
    tape.dual(Segment::tone(ALTERNATE_MS, note_hz, false))
        .dual(Segment::winddown(note_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn alternate_wail(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let mut high = vec![Segment::windup(p.low_hz, p.high_hz, WINDUP_MS)];
    for _ in 0..p.cycles {
        high.push(Segment::winddown(p.high_hz, WAIL_FLOOR_HZ, WAIL_WINDDOWN_MS));
        high.push(Segment::windup(WAIL_FLOOR_HZ, p.high_hz, WINDUP_MS));
    }
    let low = high
        .iter()
        .map(|segment| segment.scaled(p.ratio))
        .collect::<Vec<_>>();
    let mut tape = Tape::new();
    tape.whoop(Whoop::new(high, low)).dual(Segment::winddown(
        p.high_hz,
        WHOOP_WINDDOWN_HZ,
        p.winddown_ms,
    ));
    tape
}

pub fn alternate_fast_wail(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let (high_hz, ratio) = (p.high_hz, p.ratio);
    let mut high = vec![Segment::windup(p.low_hz, high_hz, WINDUP_MS)];
    let mut low =
        vec![Segment::windup(p.low_hz * ratio, high_hz * ratio, WINDUP_MS)];
    // The low stream's flutter floor only scales the depth, not the high frequency itself.
    let high_floor_hz = high_hz - FLUTTER_DEPTH_HZ;
    let low_floor_hz = high_hz - FLUTTER_DEPTH_HZ * ratio;
    for _ in 0..p.cycles {
        high.push(Segment::winddown(high_hz, high_floor_hz, FLUTTER_MS));
        high.push(Segment::windup(high_floor_hz, high_hz, FLUTTER_MS));
        low.push(Segment::winddown(high_hz * ratio, low_floor_hz, FLUTTER_MS));
        low.push(Segment::windup(low_floor_hz, high_hz * ratio, FLUTTER_MS));
    }
    let mut tape = Tape::new();
    tape.whoop(Whoop::new(high, low)).dual(Segment::winddown(
        high_hz,
        WHOOP_WINDDOWN_HZ,
        p.winddown_ms,
    ));
    tape
}

pub fn dual_whoop(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let mut tape = Tape::new();
    for _ in 0..p.cycles * 2 {
        tape.dual(Segment::windup(p.low_hz, p.high_hz, DUAL_WHOOP_SWEEP_MS))
            .single(Segment::silence(DUAL_WHOOP_GAP_MS));
    }
    tape
}

pub fn single_chimes() -> Tape {
    chimes::tape(&chimes::SINGLE)
}

pub fn single_alert(config: &AudioConfig, alert_ms: f64) -> Tape {
    let p = Params::new(config);
    let mut tape = Tape::new();
    tape.single(Segment::windup(p.low_hz, p.high_hz, WINDUP_MS))
        .single(Segment::tone(alert_ms, p.high_hz, false))
        .single(Segment::winddown(p.high_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn single_wail(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let mut tape = Tape::new();
    tape.single(Segment::windup(p.low_hz, p.high_hz, WINDUP_MS));
    for _ in 0..p.cycles {
        tape.single(Segment::tone(ALERT_MS, p.high_hz, false))
            .single(Segment::winddown(
                p.high_hz,
                WAIL_FLOOR_HZ,
                WAIL_WINDDOWN_MS,
            ))
            .single(Segment::windup(WAIL_FLOOR_HZ, p.high_hz, WINDUP_MS));
    }
    tape.single(Segment::tone(ALERT_MS, p.high_hz, false))
        .single(Segment::winddown(p.high_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn single_fast_wail(config: &AudioConfig) -> Tape {
    let p = Params::new(config);
    let flutter_hz = p.high_hz - FLUTTER_DEPTH_HZ;
    let mut tape = Tape::new();
    tape.single(Segment::windup(p.low_hz, p.high_hz, WINDUP_MS));
    for _ in 0..p.cycles {
        tape.single(Segment::winddown(p.high_hz, flutter_hz, FLUTTER_MS))
            .single(Segment::windup(flutter_hz, p.high_hz, FLUTTER_MS));
    }
    tape.single(Segment::tone(ALERT_MS, p.high_hz, false))
        .single(Segment::winddown(p.high_hz, p.low_hz, p.winddown_ms));
    tape
}

pub fn dual_chimes() -> Tape {
    let mut tape = Tape::new();
    tape.mix(
        chimes::tape(&chimes::DUAL_UPPER),
        chimes::tape(&chimes::DUAL_LOWER),
    );
    tape
}

#[cfg(test)]
mod test {
    use super::*;
    use siren_core::{Part, timed_len};

    fn config() -> AudioConfig {
        AudioConfig::default()
    }

    #[test]
    fn dual_wail_layout() {
        let tape = dual_wail(&config());
        // windup, 3 cycles of 3 parts, alert, winddown
        assert_eq!(tape.parts().len(), 1 + 3 * 3 + 2);
        assert!(tape.parts().iter().all(|p| matches!(p, Part::Dual(_))));
        assert_eq!(
            tape.parts()[2],
            Part::Dual(Segment::winddown(800.0, 200.0, 4000.0))
        );
    }

    #[test]
    fn alternate_alert_doubles_the_cycle_count() {
        let tape = alternate_alert(&config());
        let singles = tape
            .parts()
            .iter()
            .filter(|p| matches!(p, Part::Single(_)))
            .count();
        assert_eq!(singles, 3 * 2 * 2);
        let ratio = 5.0 / 6.0;
        assert_eq!(
            tape.parts()[3],
            Part::Single(Segment::tone(500.0, 622.25 * ratio, true))
        );
    }

    #[test]
    fn alternate_wail_low_stream_is_scaled_high_stream() {
        let tape = alternate_wail(&config());
        let Part::Whoop(whoop) = &tape.parts()[0] else {
            panic!("expected a whoop");
        };
        assert_eq!(whoop.high().len(), whoop.low().len());
        for (high, low) in whoop.high().iter().zip(whoop.low()) {
            assert_eq!(high.scaled(5.0 / 6.0), *low);
        }
        assert_eq!(
            tape.parts()[1],
            Part::Dual(Segment::winddown(800.0, 100.0, 10000.0))
        );
    }

    #[test]
    fn alternate_fast_wail_low_floor_scales_only_the_depth() {
        let tape = alternate_fast_wail(&config());
        let Part::Whoop(whoop) = &tape.parts()[0] else {
            panic!("expected a whoop");
        };
        let ratio = 5.0 / 6.0;
        let floor_hz = 800.0 - 200.0 * ratio;
        assert_eq!(
            whoop.low()[1],
            Segment::winddown(800.0 * ratio, floor_hz, 1000.0).halved()
        );
        assert_eq!(
            whoop.high()[1],
            Segment::winddown(800.0, 600.0, 1000.0).halved()
        );
    }

    #[test]
    fn dual_whoop_length() {
        let config = config();
        let expected = 6 * (timed_len(44100, 1500.0) + 22050);
        assert_eq!(dual_whoop(&config).num_samples(&config), expected);
    }

    #[test]
    fn single_alert_length() {
        let config = config();
        let expected = timed_len(44100, 3000.0)
            + timed_len(44100, 1000.0)
            + timed_len(44100, 10000.0);
        assert_eq!(expected, 617400);
        assert_eq!(single_alert(&config, 1000.0).num_samples(&config), expected);
    }
}
