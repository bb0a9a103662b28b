#![allow(clippy::unwrap_used, clippy::expect_used)]

use burn::backend::NdArray;
use burn::tensor::ops::FloatElem;
use burn::tensor::{Distribution, Tensor, Tolerance};
use eegformer::ModelError;
use eegformer::modules::attention::{CumulativeAttentionConfig, prefix_accumulate};

type TestBackend = NdArray<f32>;
type FT = FloatElem<TestBackend>;

#[test]
fn test_prefix_accumulate_running_sum() {
    let device = Default::default();
    let input = Tensor::<TestBackend, 4>::from_floats(
        [[[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]]]],
        &device,
    );

    let output = prefix_accumulate(input);

    // Position 0 is the base, positions 1..2 accumulate, the final position
    // stays raw.
    let expected = Tensor::<TestBackend, 4>::from_floats(
        [[[[1.0, 10.0], [3.0, 30.0], [6.0, 60.0], [4.0, 40.0]]]],
        &device,
    );
    output
        .to_data()
        .assert_approx_eq::<FT>(&expected.to_data(), Tolerance::default());
}

#[test]
fn test_prefix_accumulate_single_token_is_noop() {
    let device = Default::default();
    // One real token after the aggregate: nothing accumulates.
    let input =
        Tensor::<TestBackend, 4>::from_floats([[[[5.0, -1.0], [7.0, 2.0]]]], &device);

    let output = prefix_accumulate(input.clone());

    output
        .to_data()
        .assert_approx_eq::<FT>(&input.to_data(), Tolerance::default());
}

#[test]
fn test_attention_preserves_shape() {
    let device = Default::default();
    let attention = CumulativeAttentionConfig::new(8, 2)
        .init::<TestBackend>(&device)
        .unwrap();

    let input =
        Tensor::<TestBackend, 3>::random([3, 5, 8], Distribution::Default, &device);
    let output = attention.forward(input);

    assert_eq!(output.dims(), [3, 5, 8]);
}

#[test]
fn test_attention_rejects_indivisible_heads() {
    let device: <TestBackend as burn::prelude::Backend>::Device = Default::default();

    for (num_features, num_heads) in [(10, 3), (8, 0), (4, 8)] {
        let result = CumulativeAttentionConfig::new(num_features, num_heads)
            .init::<TestBackend>(&device);
        assert!(
            matches!(result, Err(ModelError::InvalidHeadCount { .. })),
            "features {num_features} / heads {num_heads} should be rejected"
        );
    }

    for (num_features, num_heads) in [(8, 2), (8, 8), (12, 3)] {
        assert!(
            CumulativeAttentionConfig::new(num_features, num_heads)
                .init::<TestBackend>(&device)
                .is_ok(),
            "features {num_features} / heads {num_heads} should be accepted"
        );
    }
}
