// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Whole-driver scenarios: each of the four drivers against the same
//! target, plus the error paths a caller actually hits.

use nfm::core::Nfm;
use nfm::function::{NoisyFunction, NoisyFunctionWithGradient};
use nfm::noisy::{NoisyGradient, NoisyValue};
use nfm::solver::{Adam, AdamConfig, CgConfig, ConjugateGradient, Fire, FireConfig, Irene};
use nfm::NfmError;

/// Rosenbrock's banana, a harder test than a quadratic bowl: curved valley,
/// minimum at (1, 1).
struct Rosenbrock;

impl NoisyFunction for Rosenbrock {
    fn ndim(&self) -> usize {
        2
    }
    fn f(&self, x: &[f64]) -> NoisyValue {
        let a = 1.0 - x[0];
        let b = x[1] - x[0] * x[0];
        NoisyValue::new(a * a + 100.0 * b * b, 0.0)
    }
}

impl NoisyFunctionWithGradient for Rosenbrock {
    fn grad(&self, x: &[f64], out: &mut NoisyGradient) {
        let b = x[1] - x[0] * x[0];
        out.val[0] = -2.0 * (1.0 - x[0]) - 400.0 * x[0] * b;
        out.val[1] = 200.0 * b;
    }
}

#[test]
fn conjugate_gradient_reaches_rosenbrock_minimum() {
    let f = Rosenbrock;
    let mut cg = ConjugateGradient::new(&f, vec![-1.2, 1.0], CgConfig::default()).unwrap();
    cg.set_max_n_iterations(500);
    let result = cg.find_min();
    assert!((result.x[0] - 1.0).abs() < 0.05, "{:?}", result.x);
    assert!((result.x[1] - 1.0).abs() < 0.05, "{:?}", result.x);
    let (n_f, n_g) = cg.get_func_counts();
    assert!(n_f > 0 && n_g > 0);
}

#[test]
fn adam_reaches_rosenbrock_minimum() {
    let f = Rosenbrock;
    let config = AdamConfig { alpha: 0.01, ..AdamConfig::default() };
    let mut adam = Adam::new(&f, vec![-1.2, 1.0], config).unwrap();
    adam.set_max_n_iterations(20_000);
    adam.set_max_n_const_values(200);
    let result = adam.find_min();
    assert!((result.x[0] - 1.0).abs() < 0.1, "{:?}", result.x);
    assert!((result.x[1] - 1.0).abs() < 0.1, "{:?}", result.x);
}

#[test]
fn fire_reaches_rosenbrock_minimum() {
    let f = Rosenbrock;
    let config = FireConfig { dt0: 0.01, dtmax: 0.05, ..FireConfig::default() };
    let mut fire = Fire::new(&f, vec![-1.2, 1.0], config).unwrap();
    fire.set_max_n_iterations(20_000);
    let result = fire.find_min();
    assert!((result.x[0] - 1.0).abs() < 0.1, "{:?}", result.x);
    assert!((result.x[1] - 1.0).abs() < 0.1, "{:?}", result.x);
}

#[test]
fn irene_reaches_rosenbrock_minimum() {
    let f = Rosenbrock;
    let config = FireConfig { dt0: 0.01, dtmax: 0.05, ..FireConfig::default() };
    let mut irene = Irene::new(&f, vec![-1.2, 1.0], config).unwrap();
    irene.set_max_n_iterations(20_000);
    let result = irene.find_min();
    assert!((result.x[0] - 1.0).abs() < 0.1, "{:?}", result.x);
    assert!((result.x[1] - 1.0).abs() < 0.1, "{:?}", result.x);
}

#[test]
fn find_min_is_rerunnable_from_a_new_starting_point() {
    let f = Rosenbrock;
    let mut cg = ConjugateGradient::new(&f, vec![-1.2, 1.0], CgConfig::default()).unwrap();
    cg.set_max_n_iterations(500);
    let _ = cg.find_min();
    cg.set_x(vec![2.0, 2.0]);
    let result = cg.find_min();
    assert!((result.x[0] - 1.0).abs() < 0.05, "{:?}", result.x);
    assert!((result.x[1] - 1.0).abs() < 0.05, "{:?}", result.x);
}

#[test]
fn constructors_reject_empty_and_mismatched_x0() {
    let f = Rosenbrock;
    assert!(matches!(
        ConjugateGradient::new(&f, vec![], CgConfig::default()),
        Err(NfmError::InvalidArgument(_))
    ));
    assert!(matches!(
        Adam::new(&f, vec![0.0, 0.0, 0.0], AdamConfig::default()),
        Err(NfmError::DimensionMismatch(_))
    ));
}

#[test]
fn noisy_sphere_still_converges_near_the_minimum() {
    // A function whose reported error is large enough that the drivers must
    // rely on noisy comparisons rather than exact equality to make progress.
    struct NoisySphere;
    impl NoisyFunction for NoisySphere {
        fn ndim(&self) -> usize {
            2
        }
        fn f(&self, x: &[f64]) -> NoisyValue {
            NoisyValue::new(x[0] * x[0] + x[1] * x[1], 1e-6)
        }
    }
    impl NoisyFunctionWithGradient for NoisySphere {
        fn grad(&self, x: &[f64], out: &mut NoisyGradient) {
            out.val[0] = 2.0 * x[0];
            out.val[1] = 2.0 * x[1];
            out.err = Some(vec![1e-6, 1e-6]);
        }
    }

    let f = NoisySphere;
    let mut cg = ConjugateGradient::new(&f, vec![3.0, -4.0], CgConfig::default()).unwrap();
    cg.set_max_n_iterations(200);
    let result = cg.find_min();
    assert!(result.x[0].abs() < 0.1, "{:?}", result.x);
    assert!(result.x[1].abs() < 0.1, "{:?}", result.x);
}
