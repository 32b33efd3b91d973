mod config;
pub use config::{AudioConfig, PortRatio};
pub mod error;
pub use error::{ConfigError, SynthError};
pub mod oscillator;
pub use oscillator::{OscillatorKind, chirp, chirp_phase, wave};
pub mod segment;
pub use segment::{
    Segment, silence, silence_len, steady_tone, timed_len, winddown, windup,
};
pub mod compose;
pub use compose::{Whoop, average, dual, interleave_chunks, whoop_chunk_len};
pub mod tape;
pub use tape::{Part, Tape};
pub mod pcm;
