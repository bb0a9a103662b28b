use burn::config::Config;
use burn::module::Module;
use burn::tensor::{Tensor, backend::Backend};

use crate::error::ModelResult;
use crate::modules::encoder::{Encoder, EncoderConfig};

/// Configuration to create a [RegionalTransformer] using the
/// [init function](RegionalTransformerConfig::init).
#[derive(Config, Debug)]
pub struct RegionalTransformerConfig {
    /// Electrode channels (the unattended axis).
    pub channels: usize,
    /// Filter tokens attended over as channel regions.
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

/// Attends across filter-region tokens independently within each channel.
#[derive(Module, Debug)]
pub struct RegionalTransformer<B: Backend> {
    encoder: Encoder<B>,
}

impl RegionalTransformerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<RegionalTransformer<B>> {
        Ok(RegionalTransformer {
            encoder: EncoderConfig::new(
                self.channels,
                self.regions,
                self.num_features,
                self.num_blocks,
                self.num_heads,
            )
            .with_dropout_rate(self.dropout_rate)
            .init(device)?,
        })
    }
}

impl<B: Backend> RegionalTransformer<B> {
    /// Shape `[channels, regions, reduced_time]` in,
    /// `[channels, regions + 1, reduced_time]` out.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.encoder.forward(x)
    }

    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.encoder.weight_l1()
    }
}
