// Copyright (c) EEGformer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Truncated-normal parameter initialization.

use std::f64::consts::SQRT_2;

use burn::tensor::{Distribution, Tensor, TensorData, backend::Backend};

/// Standard normal cumulative distribution function.
fn norm_cdf(x: f64) -> f64 {
    (1.0 + erf(x / SQRT_2)) / 2.0
}

/// Rational approximation of the error function (Abramowitz & Stegun 7.1.26),
/// max absolute error 1.5e-7.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Polynomial approximation of the inverse error function (Giles, 2012).
fn erf_inv(x: f64) -> f64 {
    let w = -((1.0 - x) * (1.0 + x)).ln();
    let (w, coefficients): (f64, [f64; 9]) = if w < 5.0 {
        (
            w - 2.5,
            [
                2.81022636e-08,
                3.43273939e-07,
                -3.5233877e-06,
                -4.39150654e-06,
                0.00021858087,
                -0.00125372503,
                -0.00417768164,
                0.246640727,
                1.50140941,
            ],
        )
    } else {
        (
            w.sqrt() - 3.0,
            [
                -0.000200214257,
                0.000100950558,
                0.00134934322,
                -0.00367342844,
                0.00573950773,
                -0.0076224613,
                0.00943887047,
                1.00167406,
                2.83297682,
            ],
        )
    };
    let mut p = coefficients[0];
    for c in &coefficients[1..] {
        p = c + p * w;
    }
    p * x
}

/// Samples a fresh tensor from a normal distribution with the given `mean`
/// and `std`, truncated to `[low, high]`.
///
/// Values are drawn uniformly inside the CDF image of the bounds and mapped
/// back through the inverse CDF, then clamped to the bounds to guard
/// floating-point edge effects. Warns (non-fatally) when `mean` lies more
/// than two standard deviations outside the bounds; the resulting
/// distribution may be degenerate.
pub fn trunc_normal<B: Backend, const D: usize>(
    shape: [usize; D],
    mean: f64,
    std: f64,
    low: f64,
    high: f64,
    device: &B::Device,
) -> Tensor<B, D> {
    if mean < low - 2.0 * std || mean > high + 2.0 * std {
        tracing::warn!(
            mean,
            std,
            low,
            high,
            "truncated-normal mean is more than 2 std outside the bounds; \
             the distribution of values may be incorrect"
        );
    }

    let cdf_low = 2.0 * norm_cdf((low - mean) / std) - 1.0;
    let cdf_high = 2.0 * norm_cdf((high - mean) / std) - 1.0;

    let uniform = if cdf_high > cdf_low {
        Tensor::<B, D>::random(shape, Distribution::Uniform(cdf_low, cdf_high), device)
    } else {
        Tensor::full(shape, cdf_low, device)
    };

    let values = uniform
        .into_data()
        .iter::<f64>()
        .map(|v| (erf_inv(v) * std * SQRT_2 + mean).clamp(low, high))
        .collect::<Vec<_>>();

    Tensor::from_data(TensorData::new(values, shape), device)
}
