// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `multiLineMin`: one bracket-then-Brent line search along a direction in
//! the multi-dimensional driver's space, with a non-deteriorating guarantee.

use super::bracket::find_bracket;
use super::brent::brent_min;
use super::consts::{IGOLD2, STD_FTOL, STD_XTOL};
use super::projection::FunProjection1D;
use crate::error::NfmError;
use crate::function::NoisyFunction;
use crate::noisy::NoisyIOPair;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Tunables for a single `multiLineMin` call, shared by every multi-D driver
/// built on the 1D kernel.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct MlmParams {
    pub step_left: f64,
    pub step_right: f64,
    pub max_n_bracket: usize,
    pub max_n_minimize: usize,
    pub eps_x: f64,
    pub eps_f: f64,
}

impl Default for MlmParams {
    fn default() -> Self {
        MlmParams {
            step_left: 0.0,
            step_right: 1.0,
            max_n_bracket: 10,
            max_n_minimize: 20,
            eps_x: STD_XTOL,
            eps_f: STD_FTOL,
        }
    }
}

/// Restricts `f` to the line through `p0_pair.x` in direction `d`, brackets
/// and Brent-minimizes along it, and returns the new point only if it is
/// noisily no worse than `p0_pair`; otherwise returns `p0_pair` unchanged, so
/// callers always make non-deteriorating progress.
///
/// Fails with [`NfmError::InvalidArgument`] if `step_left < 0` or
/// `step_right <= 0`, and with [`NfmError::DimensionMismatch`] if `d`'s
/// length disagrees with `p0_pair.x`'s or `f`'s.
pub fn multi_line_min<F: NoisyFunction>(
    f: &F,
    p0_pair: &NoisyIOPair,
    d: &[f64],
    params: &MlmParams,
) -> Result<NoisyIOPair, NfmError> {
    if params.step_left < 0.0 {
        return Err(NfmError::InvalidArgument(format!(
            "step_left must be >= 0, got {}",
            params.step_left
        )));
    }
    if params.step_right <= 0.0 {
        return Err(NfmError::InvalidArgument(format!(
            "step_right must be > 0, got {}",
            params.step_right
        )));
    }

    let proj = FunProjection1D::new(f, &p0_pair.x, d)?;
    let mut eval = |t: f64| proj.eval(t);

    let ax = -params.step_left;
    let cx = params.step_right;
    let bx = ax + (cx - ax) * IGOLD2;

    let fa = if params.step_left == 0.0 {
        p0_pair.f
    } else {
        eval(ax)
    };
    let fb = eval(bx);
    let fc = eval(cx);

    let mut bracket = crate::noisy::NoisyBracket::new(
        crate::noisy::NoisyIOPair1D::new(ax, fa),
        crate::noisy::NoisyIOPair1D::new(bx, fb),
        crate::noisy::NoisyIOPair1D::new(cx, fc),
    );

    if !find_bracket(&mut eval, &mut bracket, params.max_n_bracket, params.eps_x) {
        return Ok(p0_pair.clone());
    }

    let result = brent_min(&mut eval, bracket, params.max_n_minimize, params.eps_x, params.eps_f)
        .expect("bracket already validated by find_bracket");

    if result.f.noisy_le(&p0_pair.f) {
        Ok(NoisyIOPair::new(proj.point_at(result.x), result.f))
    } else {
        Ok(p0_pair.clone())
    }
}
