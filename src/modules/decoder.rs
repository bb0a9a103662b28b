// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

use burn::config::Config;
use burn::module::Module;
use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{Tensor, backend::Backend};

/// Configuration to create a [ConvDecoder] using the
/// [init function](ConvDecoderConfig::init).
#[derive(Config, Debug)]
pub struct ConvDecoderConfig {
    /// Sequence extent of the decoder input (channels + aggregate).
    pub seq_len: usize,
    /// Channel extent collapsed by the first convolution (regions + aggregate).
    pub channels: usize,
    /// Segment extent (segments + aggregate).
    pub segments: usize,
    /// Width the sequence axis is compressed to by the second convolution.
    pub compress_len: usize,
    /// Number of output classes.
    pub num_classes: usize,
}

/// Collapses the channel, sequence and segment axes through three 1x1
/// convolutions and projects the rest to class logits. No activation is
/// applied; the caller normalizes.
#[derive(Module, Debug)]
pub struct ConvDecoder<B: Backend> {
    collapse_channels: Conv1d<B>,
    collapse_sequence: Conv1d<B>,
    collapse_segments: Conv1d<B>,
    classify: Linear<B>,
}

impl ConvDecoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvDecoder<B> {
        let pointwise = |in_channels: usize, out_channels: usize| {
            Conv1dConfig::new(in_channels, out_channels, 1).init(device)
        };

        ConvDecoder {
            collapse_channels: pointwise(self.channels, 1),
            collapse_sequence: pointwise(self.seq_len, self.compress_len),
            collapse_segments: pointwise(self.segments, self.segments / 2),
            classify: LinearConfig::new((self.segments / 2) * self.compress_len, self.num_classes)
                .init(device),
        }
    }
}

impl<B: Backend> ConvDecoder<B> {
    /// Shape `[segments, seq, channels]` in, `[1, num_classes]` logits out.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = x.swap_dims(0, 1).swap_dims(1, 2);

        // [seq, channels, segments] -> [seq, segments]
        let x: Tensor<B, 2> = self.collapse_channels.forward(x).squeeze(1);
        // [seq, segments] -> [compress, segments] -> [segments, compress]
        let x: Tensor<B, 2> = self
            .collapse_sequence
            .forward(x.unsqueeze::<3>())
            .squeeze(0);
        let x = x.swap_dims(0, 1);
        // [segments, compress] -> [segments / 2, compress]
        let x: Tensor<B, 2> = self
            .collapse_segments
            .forward(x.unsqueeze::<3>())
            .squeeze(0);

        let [rows, cols] = x.dims();
        self.classify.forward(x.reshape([1, rows * cols]))
    }

    /// Sum of absolute values of the classifier and convolution weights.
    pub(crate) fn weight_l1(&self) -> Tensor<B, 1> {
        self.classify.weight.val().abs().sum()
            + self.collapse_channels.weight.val().abs().sum()
            + self.collapse_sequence.weight.val().abs().sum()
            + self.collapse_segments.weight.val().abs().sum()
    }
}
