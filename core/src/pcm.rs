//! Raw PCM as expected by the audio sink: one native-endian 32-bit float per sample, mono, no
//! header.

use thiserror::Error;

const BYTES_PER_SAMPLE: usize = std::mem::size_of::<f32>();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} bytes is not a whole number of f32 samples")]
pub struct PartialSample(pub usize);

pub fn serialize(samples: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice::<f32, u8>(samples).to_vec()
}

pub fn deserialize(bytes: &[u8]) -> Result<Vec<f32>, PartialSample> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(PartialSample(bytes.len()));
    }
    // the byte buffer has no alignment guarantee so copy rather than cast in place
    Ok(bytemuck::allocation::pod_collect_to_vec::<u8, f32>(bytes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_float_per_sample() {
        let bytes = serialize(&[0.0, 1.0, -0.5]);
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[4..8], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn round_trip_is_exact() {
        let samples = vec![0.0, 0.1, -0.3, f32::MIN_POSITIVE, 0.299_999_98, -1.0];
        assert_eq!(deserialize(&serialize(&samples)), Ok(samples));
    }

    #[test]
    fn partial_sample_is_an_error() {
        assert_eq!(deserialize(&[0, 0, 0, 0, 1]), Err(PartialSample(5)));
    }

    #[test]
    fn empty() {
        assert!(serialize(&[]).is_empty());
        assert_eq!(deserialize(&[]), Ok(Vec::new()));
    }
}
