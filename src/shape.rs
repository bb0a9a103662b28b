use crate::error::{ModelError, ModelResult};
use crate::modules::embedder::NUM_FILTERS;

/// Axis extents of every intermediate tensor in the pipeline, derived once
/// from the raw signal shape and passed to each component's builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageShapes {
    /// Electrode channels in the raw signal.
    pub channels: usize,
    /// Depthwise filters per channel produced by the patch embedder.
    pub filters: usize,
    /// Time length remaining after the three valid convolutions.
    pub reduced_time: usize,
}

impl StageShapes {
    /// Derives the stage extents for a `[channels, time_len]` signal run
    /// through three valid depthwise convolutions of width `kernel_size`.
    pub fn derive(channels: usize, time_len: usize, kernel_size: usize) -> ModelResult<Self> {
        let shrink = 3 * kernel_size.saturating_sub(1);
        if kernel_size == 0 || time_len <= shrink {
            return Err(ModelError::InputTooShort { time_len, kernel_size });
        }
        Ok(Self { channels, filters: NUM_FILTERS, reduced_time: time_len - shrink })
    }

    /// `[channels, filters, reduced_time]`, patch embedder output.
    pub fn patch(&self) -> [usize; 3] {
        [self.channels, self.filters, self.reduced_time]
    }

    /// `[channels, filters + 1, reduced_time]`, regional stage output.
    pub fn regional(&self) -> [usize; 3] {
        [self.channels, self.filters + 1, self.reduced_time]
    }

    /// `[filters + 1, channels + 1, reduced_time]`, synchronous stage output.
    pub fn synchronous(&self) -> [usize; 3] {
        [self.filters + 1, self.channels + 1, self.reduced_time]
    }

    /// `[segments + 1, channels + 1, filters + 1]`, temporal stage output.
    pub fn temporal(&self, num_segments: usize) -> [usize; 3] {
        [num_segments + 1, self.channels + 1, self.filters + 1]
    }

    /// Flattened feature width of one temporal segment token.
    pub fn segment_features(&self) -> usize {
        (self.channels + 1) * (self.filters + 1)
    }
}
