use crate::{AudioConfig, Segment, SynthError, Whoop, compose};

/// One entry on a tape.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Single(Segment),
    /// The segment mixed with its port-ratio-scaled copy.
    Dual(Segment),
    Whoop(Whoop),
    /// Two tapes of equal length played together, mixed evenly.
    Mix(Tape, Tape),
}

impl Part {
    pub fn num_samples(&self, config: &AudioConfig) -> usize {
        match self {
            Self::Single(segment) | Self::Dual(segment) => {
                segment.num_samples(config)
            }
            Self::Whoop(whoop) => whoop.num_samples(config),
            Self::Mix(a, _) => a.num_samples(config),
        }
    }

    fn check(&self) -> Result<(), SynthError> {
        match self {
            Self::Single(segment) | Self::Dual(segment) => segment.check(),
            Self::Whoop(whoop) => whoop.check(),
            Self::Mix(a, b) => a.check().and(b.check()),
        }
    }

    fn render_into(&self, config: &AudioConfig, out: &mut [f32]) {
        match self {
            Self::Single(segment) => segment.render_into(config, out),
            Self::Dual(segment) => compose::dual_into(config, segment, out),
            Self::Whoop(whoop) => whoop.render_into(config, out),
            Self::Mix(a, b) => {
                assert_eq!(
                    a.num_samples(config),
                    b.num_samples(config),
                    "mixed tapes differ in length"
                );
                a.render_into(config, out);
                let other = b.render_unchecked(config);
                for (sample, other) in out.iter_mut().zip(other) {
                    *sample = (*sample + other) / 2.0;
                }
            }
        }
    }
}

/// An ordered recipe of parts. Rendering works out the total length up front and writes every
/// part straight into its own slice of a single buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tape {
    parts: Vec<Part>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn push(&mut self, part: Part) -> &mut Self {
        self.parts.push(part);
        self
    }

    pub fn single(&mut self, segment: Segment) -> &mut Self {
        self.push(Part::Single(segment))
    }

    pub fn dual(&mut self, segment: Segment) -> &mut Self {
        self.push(Part::Dual(segment))
    }

    pub fn whoop(&mut self, whoop: Whoop) -> &mut Self {
        self.push(Part::Whoop(whoop))
    }

    pub fn mix(&mut self, a: Tape, b: Tape) -> &mut Self {
        self.push(Part::Mix(a, b))
    }

    pub fn num_samples(&self, config: &AudioConfig) -> usize {
        self.parts.iter().map(|part| part.num_samples(config)).sum()
    }

    /// Fails if any sweep has a negative duration, before any sample is computed.
    pub fn check(&self) -> Result<(), SynthError> {
        self.parts.iter().try_for_each(Part::check)
    }

    fn render_into(&self, config: &AudioConfig, out: &mut [f32]) {
        let mut offset = 0;
        for part in &self.parts {
            let len = part.num_samples(config);
            part.render_into(config, &mut out[offset..offset + len]);
            offset += len;
        }
        assert_eq!(offset, out.len());
    }

    fn render_unchecked(&self, config: &AudioConfig) -> Vec<f32> {
        let mut out = vec![0.0; self.num_samples(config)];
        self.render_into(config, &mut out);
        out
    }

    pub fn render(&self, config: &AudioConfig) -> Result<Vec<f32>, SynthError> {
        self.check()?;
        let num_samples = self.num_samples(config);
        log::debug!(
            "rendering {} parts into {} samples ({:.2}s)",
            self.parts.len(),
            num_samples,
            num_samples as f64 / config.sample_rate_hz as f64
        );
        let mut out = vec![0.0; num_samples];
        self.render_into(config, &mut out);
        Ok(out)
    }
}
