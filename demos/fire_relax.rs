// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Relaxes a 10-dimensional sum-of-quartics well with FIRE, logging
//! progress to the terminal.

use nfm::core::Nfm;
use nfm::function::{NoisyFunction, NoisyFunctionWithGradient};
use nfm::noisy::{NoisyGradient, NoisyValue};
use nfm::observers::{set_global_logger, LogLevel, LogSink};
use nfm::solver::{Fire, FireConfig};

struct QuarticWell {
    centers: Vec<f64>,
}

impl NoisyFunction for QuarticWell {
    fn ndim(&self) -> usize {
        self.centers.len()
    }
    fn f(&self, x: &[f64]) -> NoisyValue {
        let v: f64 = x
            .iter()
            .zip(self.centers.iter())
            .map(|(xi, ci)| (xi - ci).powi(4))
            .sum();
        NoisyValue::new(v, 0.0)
    }
}

impl NoisyFunctionWithGradient for QuarticWell {
    fn grad(&self, x: &[f64], out: &mut NoisyGradient) {
        for i in 0..x.len() {
            out.val[i] = 4.0 * (x[i] - self.centers[i]).powi(3);
        }
    }
}

fn main() {
    set_global_logger(LogSink::term(LogLevel::Normal));

    let centers: Vec<f64> = (0..10).map(|i| i as f64 - 4.5).collect();
    let f = QuarticWell { centers };
    let x0 = vec![0.0; 10];
    let config = FireConfig { dt0: 0.05, dtmax: 0.2, ..FireConfig::default() };
    let mut fire = Fire::new(&f, x0, config).unwrap();
    fire.set_max_n_iterations(5000);

    let result = fire.find_min();
    println!("x* = {:?}", result.x);
    println!("f(x*) = {}", result.f);
}
