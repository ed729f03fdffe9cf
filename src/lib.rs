// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # nfm
//!
//! A library for finding local minima of scalar functions whose
//! evaluations return noisy (statistical) estimates rather than exact
//! values.
//!
//! The foundation is [`noisy::NoisyValue`], a value/error pair compared
//! through confidence-interval overlap rather than bitwise equality. Every
//! higher-level component — the 1D line-search kernel
//! ([`linesearch::find_bracket`], [`linesearch::brent_min`],
//! [`linesearch::multi_line_min`]) and the four multi-dimensional drivers in
//! [`solver`] — makes its control-flow decisions through that comparison.
//!
//! ```no_run
//! use nfm::core::Nfm;
//! use nfm::function::{NoisyFunction, NoisyFunctionWithGradient};
//! use nfm::noisy::{NoisyGradient, NoisyValue};
//! use nfm::solver::{ConjugateGradient, CgConfig};
//!
//! struct Sphere;
//! impl NoisyFunction for Sphere {
//!     fn ndim(&self) -> usize { 2 }
//!     fn f(&self, x: &[f64]) -> NoisyValue {
//!         NoisyValue::new(x[0] * x[0] + x[1] * x[1], 0.0)
//!     }
//! }
//! impl NoisyFunctionWithGradient for Sphere {
//!     fn grad(&self, x: &[f64], out: &mut NoisyGradient) {
//!         out.val[0] = 2.0 * x[0];
//!         out.val[1] = 2.0 * x[1];
//!     }
//! }
//!
//! let sphere = Sphere;
//! let mut cg = ConjugateGradient::new(&sphere, vec![3.0, -4.0], CgConfig::default()).unwrap();
//! let result = cg.find_min();
//! assert!(result.x[0].abs() < 0.1 && result.x[1].abs() < 0.1);
//! ```

#[macro_use]
mod macros;

pub mod core;
pub mod error;
pub mod function;
pub mod linesearch;
pub mod md;
pub mod noisy;
pub mod observers;
pub mod solver;

pub use error::NfmError;
