use burn::config::Config;
use burn::module::Module;
use burn::tensor::{Tensor, backend::Backend};

use crate::error::ModelResult;
use crate::modules::encoder::{Encoder, EncoderConfig};

/// Configuration to create a [SynchronousTransformer] using the
/// [init function](SynchronousTransformerConfig::init).
#[derive(Config, Debug)]
pub struct SynchronousTransformerConfig {
    /// Electrode channels, attended over at synchronized time alignment.
    pub channels: usize,
    /// Filter-region tokens (the unattended axis, aggregate included).
    pub regions: usize,
    /// Width of a token representation (the reduced time length).
    pub num_features: usize,
    /// The number of transformer blocks.
    pub num_blocks: usize,
    /// The number of attention heads per block.
    pub num_heads: usize,
    /// The probability that dropout occurs in the feed-forward sublayers.
    #[config(default = 0.0)]
    pub dropout_rate: f64,
}

/// Attends across channels at synchronized time alignment, independently for
/// each filter-region token.
#[derive(Module, Debug)]
pub struct SynchronousTransformer<B: Backend> {
    encoder: Encoder<B>,
}

impl SynchronousTransformerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<SynchronousTransformer<B>> {
        Ok(SynchronousTransformer {
            encoder: EncoderConfig::new(
                self.regions + 1,
                self.channels,
                self.num_features,
                self.num_blocks,
                self.num_heads,
            )
            .with_dropout_rate(self.dropout_rate)
            .init(device)?,
        })
    }
}

impl<B: Backend> SynchronousTransformer<B> {
    /// Shape `[channels, regions + 1, reduced_time]` in,
    /// `[regions + 1, channels + 1, reduced_time]` out.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.encoder.forward(x.swap_dims(0, 1))
    }

    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.encoder.weight_l1()
    }
}
