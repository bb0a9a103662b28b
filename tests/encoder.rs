#![allow(clippy::unwrap_used, clippy::expect_used)]

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use eegformer::modules::encoder::EncoderConfig;

type TestBackend = NdArray<f32>;

#[test]
fn test_encoder_prepends_aggregate_token() {
    let device = Default::default();
    let encoder = EncoderConfig::new(2, 3, 8, 2, 2)
        .init::<TestBackend>(&device)
        .unwrap();

    let input = Tensor::<TestBackend, 3>::random([2, 3, 8], Distribution::Default, &device);
    let output = encoder.forward(input);

    assert_eq!(output.dims(), [2, 4, 8]);
}

#[test]
fn test_encoder_output_is_finite() {
    let device = Default::default();
    let encoder = EncoderConfig::new(1, 4, 6, 3, 3)
        .init::<TestBackend>(&device)
        .unwrap();

    let input = Tensor::<TestBackend, 3>::random([1, 4, 6], Distribution::Default, &device);
    let output = encoder.forward(input);

    let max_abs: f32 = output.abs().max().into_scalar();
    assert!(max_abs.is_finite());
}
