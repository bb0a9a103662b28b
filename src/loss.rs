// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Loss functions over predicted class probabilities.
//!
//! These live on the model because the regularized variants walk the model's
//! own weight tensors. All take predicted probabilities (the model's forward
//! output) and ground-truth labels, and return a scalar tensor.

use burn::tensor::{Tensor, backend::Backend};

use crate::modules::model::EegFormer;

impl<B: Backend> EegFormer<B> {
    /// Sum of absolute values of every weight tensor in every component.
    fn weight_l1(&self) -> Tensor<B, 1> {
        self.decoder.weight_l1()
            + self.temporal.weight_l1()
            + self.synchronous.weight_l1()
            + self.regional.weight_l1()
            + self.embedder.weight_l1()
    }

    /// Mean elementwise log loss of a probability vector against a one-hot
    /// (or probability) label of the same shape.
    fn log_loss(probabilities: Tensor<B, 2>, label: Tensor<B, 2>) -> Tensor<B, 1> {
        let miss = probabilities.clone().neg().add_scalar(1.0);
        let inverse_label = label.clone().neg().add_scalar(1.0);
        (label * probabilities.log() + inverse_label * miss.log())
            .neg()
            .mean()
    }

    /// Cross-entropy with an L1 penalty over every weight tensor in the
    /// model, scaled by `l1_coefficient`.
    pub fn loss_l1(
        &self,
        probabilities: Tensor<B, 2>,
        label: Tensor<B, 2>,
        l1_coefficient: f64,
    ) -> Tensor<B, 1> {
        Self::log_loss(probabilities, label) + self.weight_l1().mul_scalar(l1_coefficient)
    }

    /// Cross-entropy with the L1 penalty restricted to the decode head's
    /// weights.
    pub fn loss_l1_light(
        &self,
        probabilities: Tensor<B, 2>,
        label: Tensor<B, 2>,
        l1_coefficient: f64,
    ) -> Tensor<B, 1> {
        Self::log_loss(probabilities, label)
            + self.decoder.weight_l1().mul_scalar(l1_coefficient)
    }

    /// Cross-entropy without regularization.
    pub fn loss(&self, probabilities: Tensor<B, 2>, label: Tensor<B, 2>) -> Tensor<B, 1> {
        Self::log_loss(probabilities, label)
    }

    /// Binary cross-entropy on the positive/negative probability columns.
    /// The label is a batch of scalars in `{0, 1}` (or probabilities).
    pub fn bce(&self, probabilities: Tensor<B, 2>, label: Tensor<B, 1>) -> Tensor<B, 1> {
        let positive: Tensor<B, 1> = probabilities.clone().narrow(1, 1, 1).squeeze(1);
        let negative: Tensor<B, 1> = probabilities.narrow(1, 0, 1).squeeze(1);
        let inverse_label = label.clone().neg().add_scalar(1.0);
        (label * positive.log() + inverse_label * negative.log())
            .neg()
            .mean()
    }

    /// Binary cross-entropy reweighted by class counts:
    /// `w0 = total / (2 * (total - positives))`, `w1 = total / (2 * positives)`.
    pub fn bce_weighted(
        &self,
        probabilities: Tensor<B, 2>,
        label: Tensor<B, 1>,
        num_positive: usize,
        num_total: usize,
    ) -> Tensor<B, 1> {
        let w0 = num_total as f64 / (2.0 * (num_total - num_positive) as f64);
        let w1 = num_total as f64 / (2.0 * num_positive as f64);

        let positive: Tensor<B, 1> = probabilities.clone().narrow(1, 1, 1).squeeze(1);
        let negative: Tensor<B, 1> = probabilities.narrow(1, 0, 1).squeeze(1);
        let inverse_label = label.clone().neg().add_scalar(1.0);

        ((label * positive.log()).mul_scalar(w1)
            + (inverse_label * negative.log()).mul_scalar(w0))
        .neg()
        .mean()
    }
}
