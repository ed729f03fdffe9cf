// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use criterion::{criterion_group, criterion_main, Criterion};

use nfm::linesearch::{brent_min, find_bracket};
use nfm::noisy::{NoisyBracket, NoisyIOPair1D, NoisyValue};

fn quartic(x: f64) -> NoisyValue {
    let d = x - 1.0;
    NoisyValue::new(d * d * d * d, 0.0)
}

fn bracket_and_minimize() {
    let mut g = quartic;
    let mut bracket = NoisyBracket::new(
        NoisyIOPair1D::new(-1.0, g(-1.0)),
        NoisyIOPair1D::new(0.0, g(0.0)),
        NoisyIOPair1D::new(1.0, g(1.0)),
    );
    if find_bracket(&mut g, &mut bracket, 20, 1e-8) {
        let _ = brent_min(&mut g, bracket, 50, 1e-8, 1e-10);
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("find_bracket + brent_min on a quartic", |b| {
        b.iter(bracket_and_minimize)
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
