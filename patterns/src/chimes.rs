//! Literal note tables for the jingle patterns. These are fixed tunes and don't depend on the
//! config.

use siren_core::{Segment, Tape};

pub const NOTE_MS: f64 = 750.0;

pub const F_SHARP_HZ: f64 = 740.0;
pub const G_SHARP_HZ: f64 = 830.61;
pub const A_SHARP_HZ: f64 = 932.33;
pub const C_SHARP_HZ: f64 = 554.37;

/// Four phrases of four notes. Each phrase is followed by a rest as long as a note.
pub type Phrases = [[f64; 4]; 4];

pub const SINGLE: Phrases = [
    [F_SHARP_HZ, A_SHARP_HZ, G_SHARP_HZ, C_SHARP_HZ],
    [F_SHARP_HZ, G_SHARP_HZ, A_SHARP_HZ, F_SHARP_HZ],
    [A_SHARP_HZ, F_SHARP_HZ, G_SHARP_HZ, C_SHARP_HZ],
    [C_SHARP_HZ, G_SHARP_HZ, A_SHARP_HZ, F_SHARP_HZ],
];

// 689.46 in the last two phrases sits next to 698.46 in the first two. It's kept as it was
// written since it's not clear which one the tune intends.
pub const DUAL_UPPER: Phrases = [
    [622.25, 783.99, 698.46, 466.16],
    [622.25, 698.46, 783.99, 622.25],
    [783.99, 622.25, 689.46, 466.16],
    [466.16, 689.46, 783.99, 622.25],
];

pub const DUAL_LOWER: Phrases = [
    [392.0, 622.25, 466.16, 392.0],
    [392.0, 466.16, 622.25, 392.0],
    [466.16, 392.0, 415.3, 293.66],
    [392.0, 466.16, 622.25, 392.0],
];

/// Notes are played at half volume.
pub fn tape(phrases: &Phrases) -> Tape {
    let mut tape = Tape::new();
    for phrase in phrases {
        for &freq_hz in phrase {
            tape.single(Segment::tone(NOTE_MS, freq_hz, true));
        }
        tape.single(Segment::silence(NOTE_MS));
    }
    tape
}

#[cfg(test)]
mod test {
    use super::*;
    use siren_core::AudioConfig;

    #[test]
    fn phrase_layout() {
        let tape = tape(&SINGLE);
        assert_eq!(tape.parts().len(), 20);
        let config = AudioConfig::default();
        assert_eq!(tape.num_samples(&config), 20 * 33075);
    }

    #[test]
    fn both_dual_tapes_have_equal_length() {
        let config = AudioConfig::default();
        assert_eq!(
            tape(&DUAL_UPPER).num_samples(&config),
            tape(&DUAL_LOWER).num_samples(&config)
        );
    }
}
