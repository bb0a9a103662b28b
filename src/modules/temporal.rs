use burn::config::Config;
use burn::module::Module;
use burn::nn::{LayerNorm, LayerNormConfig};
use burn::tensor::{Tensor, backend::Backend};

use crate::error::{ModelError, ModelResult};
use crate::modules::encoder::{Encoder, EncoderConfig};

/// Averages the leading axis of a `[time, seq, chan]` tensor into
/// `num_segments` contiguous equal-size groups.
///
/// `time` must be divisible by `num_segments`; the caller validates this at
/// construction.
pub fn segment_mean<B: Backend>(x: Tensor<B, 3>, num_segments: usize) -> Tensor<B, 3> {
    let [time_len, seq_len, chan] = x.dims();
    let segment_len = time_len / num_segments;
    x.reshape([num_segments, segment_len, seq_len, chan])
        .mean_dim(1)
        .squeeze(1)
}

/// Configuration to create a [TemporalTransformer] using the
/// [init function](TemporalTransformerConfig::init).
#[derive(Config, Debug)]
pub struct TemporalTransformerConfig {
    /// Electrode channels (aggregate token excluded).
    pub channels: usize,
    /// Filter-region tokens (aggregate token excluded).
    pub regions: usize,
    /// Reduced time length to be segmented.
    pub time_len: usize,
    /// Number of contiguous segments the time axis is averaged into.
    pub num_segments: usize,
    /// The number of transformer blocks.
    pub num_blocks: usize,
    /// The number of attention heads per block.
    pub num_heads: usize,
    /// The probability that dropout occurs in the feed-forward sublayers.
    #[config(default = 0.0)]
    pub dropout_rate: f64,
}

/// Averages the time axis into segment tokens and attends across them.
///
/// Token features are the flattened `(channels + 1) x (regions + 1)` plane,
/// so this is the one stage with no unattended outer axis.
#[derive(Module, Debug)]
pub struct TemporalTransformer<B: Backend> {
    encoder: Encoder<B>,
    final_norm: LayerNorm<B>,
    num_segments: usize,
}

impl TemporalTransformerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<TemporalTransformer<B>> {
        if self.num_segments == 0
            || self.time_len % self.num_segments != 0
            || self.time_len / self.num_segments == 0
        {
            return Err(ModelError::InvalidSegmentCount {
                time_len: self.time_len,
                num_segments: self.num_segments,
            });
        }

        let num_features = (self.channels + 1) * (self.regions + 1);
        Ok(TemporalTransformer {
            encoder: EncoderConfig::new(
                1,
                self.num_segments,
                num_features,
                self.num_blocks,
                self.num_heads,
            )
            .with_dropout_rate(self.dropout_rate)
            .init(device)?,
            final_norm: LayerNormConfig::new(num_features).init(device),
            num_segments: self.num_segments,
        })
    }
}

impl<B: Backend> TemporalTransformer<B> {
    /// Shape `[regions + 1, channels + 1, reduced_time]` in,
    /// `[segments + 1, channels + 1, regions + 1]` out.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [regions, seq_len, _] = x.dims();

        let segments = segment_mean(x.swap_dims(0, 2), self.num_segments);
        let tokens = segments.reshape([1, self.num_segments, seq_len * regions]);

        let z = self.encoder.forward(tokens);
        let z = self.final_norm.forward(z);
        z.reshape([self.num_segments + 1, seq_len, regions])
    }

    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.encoder.weight_l1()
    }
}
