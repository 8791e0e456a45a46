use crate::constants::SAMPLE_NORM;

/// Anything that can report per-bin frequency magnitudes for the current frame.
///
/// Implementors write exactly `out.len()` values; bins they cannot fill must be
/// left at zero.
pub trait FrequencySource {
    fn fill(&mut self, out: &mut [u8]);
}

/// Source used before any audio is loaded: every bin reads as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl FrequencySource for Silence {
    fn fill(&mut self, out: &mut [u8]) {
        out.fill(0);
    }
}

/// Fixed-length magnitude buffer, overwritten in place every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    data: Box<[u8]>,
}

impl SampleBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn from_slice(values: &[u8]) -> Self {
        Self {
            data: values.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// First bin normalized by 128, used as a low-frequency energy proxy.
    #[inline]
    pub fn bass(&self) -> f32 {
        bass_value(&self.data)
    }
}

#[inline]
pub fn bass_value(samples: &[u8]) -> f32 {
    samples.first().map_or(0.0, |&b| b as f32 / SAMPLE_NORM)
}

/// Owns the shared [`SampleBuffer`] and refreshes it from a [`FrequencySource`].
pub struct FrequencySampler<S> {
    source: S,
    buffer: SampleBuffer,
}

impl<S: FrequencySource> FrequencySampler<S> {
    pub fn new(source: S, bin_count: usize) -> Self {
        Self {
            source,
            buffer: SampleBuffer::new(bin_count),
        }
    }

    /// Refresh the buffer for the current frame and hand it out read-only.
    pub fn sample(&mut self) -> &SampleBuffer {
        self.source.fill(&mut self.buffer.data);
        &self.buffer
    }

    /// Last sampled values without touching the source.
    #[inline]
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
