use burn::config::Config;
use burn::module::{Module, Param};
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::tensor::{Tensor, backend::Backend};

use crate::error::ModelResult;
use crate::init::trunc_normal;
use crate::modules::layer::Layer;

/// Configuration of one attention stage, expressed purely in axis extents.
///
/// The three attention stages of the pipeline bind different signal axes to
/// the roles below; the algorithm itself is identical.
#[derive(Config, Debug)]
pub struct EncoderConfig {
    /// Extent of the unattended axis, carried through attention like a batch.
    pub outer_len: usize,
    /// Number of tokens attended over, before the aggregate token is
    /// prepended.
    pub seq_len: usize,
    /// Width of a token representation.
    pub num_features: usize,
    /// The number of transformer blocks run in sequence.
    pub num_blocks: usize,
    /// The number of attention heads per block.
    pub num_heads: usize,
    /// The probability that dropout occurs in the feed-forward sublayers.
    #[config(default = 0.0)]
    pub dropout_rate: f64,
    /// The type of function used to initialize the projection weights.
    #[config(default = "Initializer::Normal{mean:0.0, std:1.0}")]
    pub initializer: Initializer,
}

/// A stack of [Layer]s over a token sequence with a prepended learned
/// aggregate token and a learned positional bias.
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    projection: Linear<B>,
    class_token: Param<Tensor<B, 3>>,
    position_bias: Param<Tensor<B, 3>>,
    layers: Vec<Layer<B>>,
}

impl EncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<Encoder<B>> {
        let layers = (0..self.num_blocks)
            .map(|_| Layer::new(self, device))
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(Encoder {
            projection: LinearConfig::new(self.num_features, self.num_features)
                .with_bias(false)
                .with_initializer(self.initializer.clone())
                .init(device),
            class_token: Param::from_tensor(trunc_normal(
                [self.outer_len, 1, self.num_features],
                0.0,
                0.02,
                -2.0,
                2.0,
                device,
            )),
            position_bias: Param::from_tensor(trunc_normal(
                [self.outer_len, self.seq_len + 1, self.num_features],
                0.0,
                0.02,
                -2.0,
                2.0,
                device,
            )),
            layers,
        })
    }
}

impl<B: Backend> Encoder<B> {
    /// Shape `[outer, seq, features]` in, `[outer, seq + 1, features]` out.
    ///
    /// The input is projected once, the aggregate token is prepended and the
    /// positional bias added; the blocks then update the token state in
    /// sequence.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let tokens = self.projection.forward(x);
        let mut z = Tensor::cat(vec![self.class_token.val(), tokens], 1)
            + self.position_bias.val();
        for layer in self.layers.iter() {
            z = layer.forward(z);
        }
        z
    }

    /// Sum of absolute values of the stage's weights (the input projection
    /// and every block's weights; the aggregate token and positional bias
    /// are not counted).
    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        let mut total = self.projection.weight.val().abs().sum();
        for layer in self.layers.iter() {
            total = total + layer.weight_l1();
        }
        total
    }
}
