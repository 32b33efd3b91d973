use crate::{AudioConfig, Segment, SynthError};
use itertools::izip;

/// Sample-wise average of two streams of equal length.
pub fn average(a: &[f32], b: &[f32]) -> Vec<f32> {
    assert_eq!(a.len(), b.len(), "averaged streams differ in length");
    izip!(a, b).map(|(a, b)| (a + b) / 2.0).collect()
}

/// Average `segment` with a copy of itself whose frequencies are scaled by the config's port
/// ratio, writing the result into `out`, which must be exactly as long as the segment.
pub fn dual_into(config: &AudioConfig, segment: &Segment, out: &mut [f32]) {
    let port = segment.scaled(config.port_ratio.as_f64());
    assert_eq!(out.len(), segment.num_samples(config));
    assert_eq!(out.len(), port.num_samples(config));
    for (index, sample) in out.iter_mut().enumerate() {
        let a = segment.sample(config, index) as f64;
        let b = port.sample(config, index) as f64;
        *sample = ((a + b) / 2.0) as f32;
    }
}

/// A segment played by two siren ports at once: the nominal pitch and the pitch scaled by the
/// port ratio, mixed evenly.
pub fn dual(config: &AudioConfig, segment: &Segment) -> Vec<f32> {
    let mut out = vec![0.0; segment.num_samples(config)];
    dual_into(config, segment, &mut out);
    out
}

/// Half a second of samples, rounded down.
pub fn whoop_chunk_len(sample_rate_hz: u32) -> usize {
    (0.5 * sample_rate_hz as f64).floor() as usize
}

/// Alternate between two streams in chunks of `chunk_len` samples, starting with `high`. The
/// final chunk may be shorter than the others.
pub fn interleave_chunks(high: &[f32], low: &[f32], chunk_len: usize) -> Vec<f32> {
    let mut out = high.to_vec();
    overwrite_odd_chunks(&mut out, low, chunk_len);
    out
}

// `out` starts as the high stream. Replace every odd-numbered chunk with the low stream's.
fn overwrite_odd_chunks(out: &mut [f32], low: &[f32], chunk_len: usize) {
    assert_eq!(out.len(), low.len(), "whoop streams differ in length");
    let chunk_len = chunk_len.max(1);
    for (out_chunk, low_chunk) in out
        .chunks_mut(chunk_len)
        .zip(low.chunks(chunk_len))
        .skip(1)
        .step_by(2)
    {
        out_chunk.copy_from_slice(low_chunk);
    }
}

/// Two independently swept streams, played alternately in half-second chunks to imitate the
/// beating of a rotating siren. Every segment is rendered at half volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Whoop {
    high: Vec<Segment>,
    low: Vec<Segment>,
}

impl Whoop {
    /// Both streams must have the same total length. Segments are halved on the way in.
    pub fn new(
        high: impl IntoIterator<Item = Segment>,
        low: impl IntoIterator<Item = Segment>,
    ) -> Self {
        Self {
            high: high.into_iter().map(Segment::halved).collect(),
            low: low.into_iter().map(Segment::halved).collect(),
        }
    }

    pub fn high(&self) -> &[Segment] {
        &self.high
    }

    pub fn low(&self) -> &[Segment] {
        &self.low
    }

    pub fn check(&self) -> Result<(), SynthError> {
        self.high.iter().chain(&self.low).try_for_each(Segment::check)
    }

    fn stream_len(segments: &[Segment], config: &AudioConfig) -> usize {
        segments.iter().map(|s| s.num_samples(config)).sum()
    }

    fn render_stream(segments: &[Segment], config: &AudioConfig, out: &mut [f32]) {
        let mut offset = 0;
        for segment in segments {
            let len = segment.num_samples(config);
            segment.render_into(config, &mut out[offset..offset + len]);
            offset += len;
        }
    }

    pub fn num_samples(&self, config: &AudioConfig) -> usize {
        Self::stream_len(&self.high, config)
    }

    pub fn render_into(&self, config: &AudioConfig, out: &mut [f32]) {
        let low_len = Self::stream_len(&self.low, config);
        assert_eq!(
            out.len(),
            low_len,
            "whoop streams produce a different number of chunks"
        );
        Self::render_stream(&self.high, config, out);
        let mut low = vec![0.0; low_len];
        Self::render_stream(&self.low, config, &mut low);
        overwrite_odd_chunks(out, &low, whoop_chunk_len(config.sample_rate_hz));
    }

    pub fn render(&self, config: &AudioConfig) -> Vec<f32> {
        let mut out = vec![0.0; self.num_samples(config)];
        self.render_into(config, &mut out);
        out
    }
}
