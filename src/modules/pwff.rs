// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Gelu, Linear, LinearConfig};
use burn::tensor::{Tensor, backend::Backend};

/// Configuration to create a [position-wise feed-forward](PositionWiseFeedForward)
/// layer using the [init function](PositionWiseFeedForwardConfig::init).
#[derive(Config, Debug)]
pub struct PositionWiseFeedForwardConfig {
    /// The size of the input and output features.
    pub embedding_dim: usize,
    /// The size of the hidden inner features.
    pub hidden_dim: usize,
    /// The probability that dropout occurs.
    #[config(default = 0.0)]
    pub dropout_rate: f64,
}

#[derive(Module, Debug)]
pub struct PositionWiseFeedForward<B: Backend> {
    linear_inner: Linear<B>,
    linear_outer: Linear<B>,
    gelu: Gelu,
    dropout: Dropout,
}

impl PositionWiseFeedForwardConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PositionWiseFeedForward<B> {
        PositionWiseFeedForward {
            linear_inner: LinearConfig::new(self.embedding_dim, self.hidden_dim).init(device),
            linear_outer: LinearConfig::new(self.hidden_dim, self.embedding_dim).init(device),
            gelu: Gelu::new(),
            dropout: DropoutConfig::new(self.dropout_rate).init(),
        }
    }
}

impl<B: Backend> PositionWiseFeedForward<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let x = self.linear_inner.forward(input);
        let x = self.dropout.forward(self.gelu.forward(x));
        let x = self.linear_outer.forward(x);
        self.dropout.forward(x)
    }

    /// Sum of absolute values of the two projection weights.
    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.linear_inner.weight.val().abs().sum()
            + self.linear_outer.weight.val().abs().sum()
    }
}
