// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod attention;
pub mod decoder;
pub mod embedder;
pub mod encoder;
pub mod layer;
pub mod model;
pub mod pwff;
pub mod regional;
pub mod synchronous;
pub mod temporal;
