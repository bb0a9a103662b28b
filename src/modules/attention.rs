// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::tensor::{Tensor, backend::Backend};

use crate::error::{ModelError, ModelResult};

/// Applies the running prefix sum across the sequence axis (axis 2) of a
/// `[outer, heads, seq, head_dim]` tensor.
///
/// Positions `1..seq-1` each absorb the sum of all earlier positions, left
/// to right; position 0 (the aggregate token) serves as the base of the
/// accumulation only, and the final position is left untouched. This
/// causal-style accumulation is how later tokens gather information from
/// earlier ones, in place of an all-pairs score matrix.
pub fn prefix_accumulate<B: Backend>(x: Tensor<B, 4>) -> Tensor<B, 4> {
    let [_, _, seq_len, _] = x.dims();
    if seq_len < 2 {
        return x;
    }

    let mut pieces = Vec::with_capacity(seq_len);
    let mut running = x.clone().narrow(2, 0, 1);
    pieces.push(running.clone());
    for position in 1..seq_len {
        let current = x.clone().narrow(2, position, 1);
        if position + 1 < seq_len {
            running = running + current;
            pieces.push(running.clone());
        } else {
            pieces.push(current);
        }
    }
    Tensor::cat(pieces, 2)
}

/// Configuration to create a [CumulativeAttention] operator using the
/// [init function](CumulativeAttentionConfig::init).
#[derive(Config, Debug)]
pub struct CumulativeAttentionConfig {
    /// Width of a token representation.
    pub num_features: usize,
    /// The number of heads.
    pub num_heads: usize,
    /// The type of function used to initialize the projection weights.
    #[config(default = "Initializer::Normal{mean:0.0, std:1.0}")]
    pub initializer: Initializer,
}

/// Multi-head attention with per-token self-gating scores and prefix-sum
/// aggregation across the sequence axis.
///
/// Each token's query is scored only against its own key (scaled by
/// `1/sqrt(head_dim)`), the score gates the token's value vector, and the
/// gated vectors are combined by [prefix_accumulate] rather than a softmax
/// over pairwise scores.
#[derive(Module, Debug)]
pub struct CumulativeAttention<B: Backend> {
    /// Linear layer to transform the input features into the query space.
    pub query: Linear<B>,
    /// Linear layer to transform the input features into the key space.
    pub key: Linear<B>,
    /// Linear layer to transform the input features into the value space.
    pub value: Linear<B>,
    /// Linear layer to transform the merged heads back to the token space.
    pub output: Linear<B>,
    /// The number of heads.
    pub num_heads: usize,
    /// The dimension per head.
    pub head_dim: usize,
}

impl CumulativeAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<CumulativeAttention<B>> {
        if self.num_heads == 0
            || self.num_features % self.num_heads != 0
            || self.num_features / self.num_heads == 0
        {
            return Err(ModelError::InvalidHeadCount {
                num_features: self.num_features,
                num_heads: self.num_heads,
            });
        }

        let linear = || {
            LinearConfig::new(self.num_features, self.num_features)
                .with_bias(false)
                .with_initializer(self.initializer.clone())
                .init(device)
        };

        Ok(CumulativeAttention {
            query: linear(),
            key: linear(),
            value: linear(),
            output: linear(),
            num_heads: self.num_heads,
            head_dim: self.num_features / self.num_heads,
        })
    }
}

impl<B: Backend> CumulativeAttention<B> {
    /// Shape `[outer, seq, features]` in and out.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [outer, seq_len, num_features] = x.dims();

        let query = self.split_heads(self.query.forward(x.clone()));
        let key = self.split_heads(self.key.forward(x.clone()));
        let value = self.split_heads(self.value.forward(x));

        // Per-token self-gating score, not a pairwise score matrix.
        let scores = (query.div_scalar((self.head_dim as f64).sqrt()) * key).sum_dim(3);
        let gated = value * scores;

        let context = prefix_accumulate(gated);
        let context = context.swap_dims(1, 2).reshape([outer, seq_len, num_features]);
        self.output.forward(context)
    }

    fn split_heads(&self, x: Tensor<B, 3>) -> Tensor<B, 4> {
        let [outer, seq_len, _] = x.dims();
        x.reshape([outer, seq_len, self.num_heads, self.head_dim]).swap_dims(1, 2)
    }

    /// Sum of absolute values of the four projection weights.
    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.query.weight.val().abs().sum()
            + self.key.weight.val().abs().sum()
            + self.value.weight.val().abs().sum()
            + self.output.weight.val().abs().sum()
    }
}
