use burn::config::Config;
use burn::module::Module;
use burn::tensor::activation::softmax;
use burn::tensor::{Tensor, backend::Backend};

use crate::error::ModelResult;
use crate::modules::decoder::{ConvDecoder, ConvDecoderConfig};
use crate::modules::embedder::{PatchEmbedder, PatchEmbedderConfig};
use crate::modules::regional::{RegionalTransformer, RegionalTransformerConfig};
use crate::modules::synchronous::{SynchronousTransformer, SynchronousTransformerConfig};
use crate::modules::temporal::{TemporalTransformer, TemporalTransformerConfig};
use crate::shape::StageShapes;

/// Configuration to create an [EegFormer] using the
/// [init function](EegFormerConfig::init).
#[derive(Config, Debug)]
pub struct EegFormerConfig {
    /// Electrode channels in the raw signal.
    pub input_channels: usize,
    /// Samples in the raw signal.
    pub time_len: usize,
    /// Kernel width of the patch embedder convolutions.
    pub kernel_size: usize,
    /// Number of output classes.
    pub num_classes: usize,
    /// Transformer blocks per attention stage.
    pub num_blocks: usize,
    /// Attention heads in the regional stage.
    pub num_heads_regional: usize,
    /// Attention heads in the synchronous stage.
    pub num_heads_synchronous: usize,
    /// Attention heads in the temporal stage.
    pub num_heads_temporal: usize,
    /// Segments the reduced time axis is averaged into.
    pub num_segments: usize,
    /// Width the decoder compresses the channel-sequence axis to.
    pub decode_width: usize,
    /// The probability that dropout occurs in the feed-forward sublayers.
    #[config(default = 0.0)]
    pub dropout_rate: f64,
}

/// The full pipeline: patch embedder, the three attention stages, and the
/// convolutional decode head.
#[derive(Module, Debug)]
pub struct EegFormer<B: Backend> {
    pub(crate) embedder: PatchEmbedder<B>,
    pub(crate) regional: RegionalTransformer<B>,
    pub(crate) synchronous: SynchronousTransformer<B>,
    pub(crate) temporal: TemporalTransformer<B>,
    pub(crate) decoder: ConvDecoder<B>,
}

impl EegFormerConfig {
    /// Initialize a new model.
    ///
    /// All stage shapes are derived here, once, from the raw signal extents;
    /// any head-count or segment-count incompatibility surfaces as an error
    /// before a forward pass can run.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<EegFormer<B>> {
        let shapes = StageShapes::derive(self.input_channels, self.time_len, self.kernel_size)?;

        Ok(EegFormer {
            embedder: PatchEmbedderConfig::new(
                self.input_channels,
                self.time_len,
                self.kernel_size,
            )
            .init(device)?,
            regional: RegionalTransformerConfig::new(
                shapes.channels,
                shapes.filters,
                shapes.reduced_time,
                self.num_blocks,
                self.num_heads_regional,
            )
            .with_dropout_rate(self.dropout_rate)
            .init(device)?,
            synchronous: SynchronousTransformerConfig::new(
                shapes.channels,
                shapes.filters,
                shapes.reduced_time,
                self.num_blocks,
                self.num_heads_synchronous,
            )
            .with_dropout_rate(self.dropout_rate)
            .init(device)?,
            temporal: TemporalTransformerConfig::new(
                shapes.channels,
                shapes.filters,
                shapes.reduced_time,
                self.num_segments,
                self.num_blocks,
                self.num_heads_temporal,
            )
            .with_dropout_rate(self.dropout_rate)
            .init(device)?,
            decoder: {
                let [segments, seq_len, channels] = shapes.temporal(self.num_segments);
                ConvDecoderConfig::new(
                    seq_len,
                    channels,
                    segments,
                    self.decode_width,
                    self.num_classes,
                )
                .init(device)
            },
        })
    }
}

impl<B: Backend> EegFormer<B> {
    /// Shape `[channels, time]` in, `[1, num_classes]` probabilities out.
    ///
    /// A pure function of the input and the current parameter values; each
    /// stage's output moves into the next, and the decoder logits are
    /// normalized into a probability distribution.
    pub fn forward(&self, signal: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.embedder.forward(signal);
        let x = self.regional.forward(x);
        let x = self.synchronous.forward(x);
        let x = self.temporal.forward(x);
        let logits = self.decoder.forward(x);
        softmax(logits, 1)
    }
}
