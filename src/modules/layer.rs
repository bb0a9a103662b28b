// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

use burn::module::Module;
use burn::nn::{LayerNorm, LayerNormConfig};
use burn::tensor::{Tensor, backend::Backend};

use crate::error::ModelResult;
use crate::modules::attention::{CumulativeAttention, CumulativeAttentionConfig};
use crate::modules::encoder::EncoderConfig;
use crate::modules::pwff::{PositionWiseFeedForward, PositionWiseFeedForwardConfig};

/// One transformer block: pre-norm cumulative attention and a pre-norm MLP,
/// each added back to the running token state as a residual.
#[derive(Module, Debug)]
pub struct Layer<B: Backend> {
    norm_attn: LayerNorm<B>,
    attention: CumulativeAttention<B>,
    norm_mlp: LayerNorm<B>,
    pwff: PositionWiseFeedForward<B>,
}

impl<B: Backend> Layer<B> {
    pub(crate) fn new(config: &EncoderConfig, device: &B::Device) -> ModelResult<Self> {
        Ok(Layer {
            norm_attn: LayerNormConfig::new(config.num_features).init(device),
            attention: CumulativeAttentionConfig::new(config.num_features, config.num_heads)
                .with_initializer(config.initializer.clone())
                .init(device)?,
            norm_mlp: LayerNormConfig::new(config.num_features).init(device),
            pwff: PositionWiseFeedForwardConfig::new(
                config.num_features,
                config.num_features * 4,
            )
            .with_dropout_rate(config.dropout_rate)
            .init(device),
        })
    }

    pub(crate) fn forward(&self, z: Tensor<B, 3>) -> Tensor<B, 3> {
        let residual_path = self.attention.forward(self.norm_attn.forward(z.clone()));
        let z = z + residual_path;
        let residual_path = self.pwff.forward(self.norm_mlp.forward(z.clone()));
        z + residual_path
    }

    /// Sum of absolute values of the block's weights: both layer-norm gains,
    /// the attention projections and the MLP projections.
    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.norm_attn.gamma.val().abs().sum()
            + self.norm_mlp.gamma.val().abs().sum()
            + self.attention.weight_l1()
            + self.pwff.weight_l1()
    }
}
