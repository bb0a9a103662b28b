#![allow(clippy::unwrap_used, clippy::expect_used)]

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use eegformer::modules::decoder::ConvDecoderConfig;
use eegformer::modules::embedder::PatchEmbedderConfig;
use eegformer::modules::regional::RegionalTransformerConfig;
use eegformer::modules::synchronous::SynchronousTransformerConfig;
use eegformer::modules::temporal::TemporalTransformerConfig;
use eegformer::{EegFormerConfig, ModelError, StageShapes};

type TestBackend = NdArray<f32>;

/// A shape set where every divisibility constraint holds: the reduced time
/// length is 30 - 3 * (3 - 1) = 24, split across 4 heads in the regional and
/// synchronous stages and into 4 segments; the temporal feature width is
/// (5 + 1) * (120 + 1) = 726, split across 6 heads.
fn valid_config() -> EegFormerConfig {
    EegFormerConfig::new(5, 30, 3, 2, 2, 4, 4, 6, 4, 3)
}

#[test]
fn test_forward_produces_probability_distribution() {
    let device = Default::default();
    let model = valid_config().init::<TestBackend>(&device).unwrap();

    let signal = Tensor::<TestBackend, 2>::random([5, 30], Distribution::Default, &device);
    let output = model.forward(signal);

    assert_eq!(output.dims(), [1, 2]);

    let minimum: f32 = output.clone().min().into_scalar();
    assert!(minimum >= 0.0);

    let total: f32 = output.sum().into_scalar();
    assert!((total - 1.0).abs() < 1e-5, "probabilities sum to {total}");
}

#[test]
fn test_stage_shape_choreography() {
    let device = Default::default();
    let channels = 2usize;
    let time_len = 12usize;
    let kernel_size = 2usize;
    let num_segments = 3usize;

    let shapes = StageShapes::derive(channels, time_len, kernel_size).unwrap();
    assert_eq!(shapes.reduced_time, 9);
    assert_eq!(shapes.segment_features(), (channels + 1) * (shapes.filters + 1));

    let embedder = PatchEmbedderConfig::new(channels, time_len, kernel_size)
        .init::<TestBackend>(&device)
        .unwrap();
    let regional = RegionalTransformerConfig::new(
        shapes.channels,
        shapes.filters,
        shapes.reduced_time,
        1,
        3,
    )
    .init::<TestBackend>(&device)
    .unwrap();
    let synchronous = SynchronousTransformerConfig::new(
        shapes.channels,
        shapes.filters,
        shapes.reduced_time,
        1,
        3,
    )
    .init::<TestBackend>(&device)
    .unwrap();
    let temporal = TemporalTransformerConfig::new(
        shapes.channels,
        shapes.filters,
        shapes.reduced_time,
        num_segments,
        1,
        3,
    )
    .init::<TestBackend>(&device)
    .unwrap();

    let signal =
        Tensor::<TestBackend, 2>::random([channels, time_len], Distribution::Default, &device);

    let x = embedder.forward(signal);
    assert_eq!(x.dims(), shapes.patch());

    let x = regional.forward(x);
    assert_eq!(x.dims(), shapes.regional());

    let x = synchronous.forward(x);
    assert_eq!(x.dims(), shapes.synchronous());

    let x = temporal.forward(x);
    assert_eq!(x.dims(), shapes.temporal(num_segments));

    let [segments, seq_len, chan] = shapes.temporal(num_segments);
    let decoder =
        ConvDecoderConfig::new(seq_len, chan, segments, 2, 3).init::<TestBackend>(&device);
    let logits = decoder.forward(x);
    assert_eq!(logits.dims(), [1, 3]);
}

#[test]
fn test_init_rejects_indivisible_regional_heads() {
    let device: <TestBackend as burn::prelude::Backend>::Device = Default::default();

    // 24 features cannot be split across 5 heads.
    let result = EegFormerConfig::new(5, 30, 3, 2, 2, 5, 4, 6, 4, 3).init::<TestBackend>(&device);
    assert!(matches!(result, Err(ModelError::InvalidHeadCount { .. })));
}

#[test]
fn test_init_rejects_indivisible_segments() {
    let device: <TestBackend as burn::prelude::Backend>::Device = Default::default();

    // 24 time steps cannot be split into 5 equal segments.
    let result = EegFormerConfig::new(5, 30, 3, 2, 2, 4, 4, 6, 5, 3).init::<TestBackend>(&device);
    assert!(matches!(result, Err(ModelError::InvalidSegmentCount { .. })));
}

#[test]
fn test_init_rejects_short_signal() {
    let device: <TestBackend as burn::prelude::Backend>::Device = Default::default();

    let result = EegFormerConfig::new(5, 6, 3, 2, 2, 4, 4, 6, 4, 3).init::<TestBackend>(&device);
    assert!(matches!(result, Err(ModelError::InputTooShort { .. })));
}
