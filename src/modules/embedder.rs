// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

use burn::config::Config;
use burn::module::Module;
use burn::nn::PaddingConfig1d;
use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::tensor::{Tensor, backend::Backend};

use crate::error::ModelResult;
use crate::shape::StageShapes;

/// Depthwise filters per input channel produced by the third convolution.
pub const NUM_FILTERS: usize = 120;

/// Configuration to create a [PatchEmbedder] using the
/// [init function](PatchEmbedderConfig::init).
#[derive(Config, Debug)]
pub struct PatchEmbedderConfig {
    /// Electrode channels in the raw signal.
    pub channels: usize,
    /// Samples in the raw signal.
    pub time_len: usize,
    /// Kernel width shared by the three depthwise convolutions.
    pub kernel_size: usize,
}

/// Three successive depthwise 1D convolutions along the time axis, valid
/// padding, stride 1, no cross-channel mixing. The first two preserve the
/// channel count; the third expands each channel into [NUM_FILTERS] feature
/// sequences.
#[derive(Module, Debug)]
pub struct PatchEmbedder<B: Backend> {
    conv1: Conv1d<B>,
    conv2: Conv1d<B>,
    conv3: Conv1d<B>,
    filters: usize,
}

impl PatchEmbedderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<PatchEmbedder<B>> {
        // Surfaces the too-short-signal case before any convolution runs.
        StageShapes::derive(self.channels, self.time_len, self.kernel_size)?;

        let depthwise = |in_channels: usize, out_channels: usize| {
            Conv1dConfig::new(in_channels, out_channels, self.kernel_size)
                .with_stride(1)
                .with_padding(PaddingConfig1d::Valid)
                .with_groups(in_channels)
                .init(device)
        };

        Ok(PatchEmbedder {
            conv1: depthwise(self.channels, self.channels),
            conv2: depthwise(self.channels, self.channels),
            conv3: depthwise(self.channels, self.channels * NUM_FILTERS),
            filters: NUM_FILTERS,
        })
    }
}

impl<B: Backend> PatchEmbedder<B> {
    /// Shape `[channels, time]` in, `[channels, filters, reduced_time]` out,
    /// with `reduced_time = time - 3 * (kernel_size - 1)`.
    pub fn forward(&self, signal: Tensor<B, 2>) -> Tensor<B, 3> {
        let x = signal.unsqueeze::<3>();
        let x = self.conv1.forward(x);
        let x = self.conv2.forward(x);
        let x = self.conv3.forward(x);
        let [_, stacked, reduced_time] = x.dims();
        x.reshape([stacked / self.filters, self.filters, reduced_time])
    }

    /// Sum of absolute values of the three convolution weights.
    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.conv1.weight.val().abs().sum()
            + self.conv2.weight.val().abs().sum()
            + self.conv3.weight.val().abs().sum()
    }
}
