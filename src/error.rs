// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

use strum_macros::IntoStaticStr;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Configuration errors detected from shapes at construction time, before
/// any forward pass runs.
#[derive(Clone, Debug, Error, IntoStaticStr)]
pub enum ModelError {
    #[error("feature dimension {num_features} cannot be split across {num_heads} heads")]
    InvalidHeadCount { num_features: usize, num_heads: usize },
    #[error("time length {time_len} cannot be split into {num_segments} equal segments")]
    InvalidSegmentCount { time_len: usize, num_segments: usize },
    #[error("signal of length {time_len} is too short for three valid convolutions of kernel size {kernel_size}")]
    InputTooShort { time_len: usize, kernel_size: usize },
}
