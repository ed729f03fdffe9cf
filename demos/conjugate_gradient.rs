// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Minimizes Rosenbrock's function with Polak-Ribiere-restart Conjugate
//! Gradient, logging progress to the terminal.

use nfm::core::Nfm;
use nfm::function::{NoisyFunction, NoisyFunctionWithGradient};
use nfm::noisy::{NoisyGradient, NoisyValue};
use nfm::observers::{set_global_logger, LogLevel, LogSink};
use nfm::solver::{CgConfig, ConjugateGradient};

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

fn main() {
    set_global_logger(LogSink::term(LogLevel::Normal));

    let f = Rosenbrock;
    let mut cg = ConjugateGradient::new(&f, vec![-1.2, 1.0], CgConfig::default()).unwrap();
    cg.set_max_n_iterations(500);

    let result = cg.find_min();
    let (n_f, n_g) = cg.get_func_counts();
    println!("x* = {:?}, f(x*) = {}", result.x, result.f);
    println!("evaluations: {n_f} values, {n_g} gradients");
}
