// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Brackets and Brent-minimizes a noisy 1D quartic, logging to the
//! terminal.

use nfm::linesearch::{brent_min, find_bracket};
use nfm::noisy::{NoisyBracket, NoisyIOPair1D, NoisyValue};
use nfm::observers::{set_global_logger, LogLevel, LogSink};

fn noisy_quartic(x: f64) -> NoisyValue {
    let d = x - 2.0;
    NoisyValue::new(d * d * d * d, 0.01)
}

fn main() {
    set_global_logger(LogSink::term(LogLevel::Verbose));
    let sink = LogSink::term(LogLevel::Normal);

    let mut g = noisy_quartic;
    let mut bracket = NoisyBracket::new(
        NoisyIOPair1D::new(-1.0, g(-1.0)),
        NoisyIOPair1D::new(0.0, g(0.0)),
        NoisyIOPair1D::new(1.0, g(1.0)),
    );

    if !find_bracket(&mut g, &mut bracket, 20, 1e-8) {
        eprintln!("failed to bracket a minimum");
        return;
    }
    sink.log_value("bracket.b", &bracket.b.f);

    match brent_min(&mut g, bracket, 50, 1e-6, 1e-8) {
        Ok(result) => {
            sink.log_value("minimum", &result.f);
            println!("x* = {:.6}, f(x*) = {}", result.x, result.f);
        }
        Err(e) => eprintln!("brent_min failed: {e}"),
    }
}
