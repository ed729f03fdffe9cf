// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `findBracket`: establishes a valid three-point bracket around a minimum.

use super::consts::IGOLD2;
use crate::noisy::{NoisyBracket, NoisyIOPair1D};

/// Expands and reshapes `bracket` in place until it satisfies the
/// bracketing invariant `a.f > b.f < c.f` (noisy), or gives up.
///
/// `bracket` must come in with `a.x < b.x < c.x` and pre-evaluated function
/// values; `g` is called to evaluate any new abscissa introduced. Returns
/// `true` on success (bracket now valid); `false` if the iteration budget
/// `n_max` is exhausted or the bracket shrinks below `eps_x` first.
///
/// `a.x` is never lowered across the whole procedure: this is a deliberate
/// asymmetry multi-dimensional callers rely on to forbid backtracking past
/// the previous line-search step.
pub fn find_bracket(
    g: &mut impl FnMut(f64) -> crate::noisy::NoisyValue,
    bracket: &mut NoisyBracket,
    n_max: usize,
    eps_x: f64,
) -> bool {
    let mut iterations = 0usize;

    // Phase 1: while adjacent values are noisily equal, expand to the right.
    loop {
        if bracket.width() < eps_x {
            return false;
        }
        if iterations >= n_max {
            return false;
        }
        let eq_ab = bracket.a.f.noisy_eq(&bracket.b.f);
        let eq_bc = bracket.b.f.noisy_eq(&bracket.c.f);
        if !eq_ab && !eq_bc {
            break;
        }
        bracket.b = bracket.c;
        let new_c_x = bracket.a.x + (bracket.b.x - bracket.a.x) / IGOLD2;
        bracket.c = NoisyIOPair1D::new(new_c_x, g(new_c_x));
        iterations += 1;
    }

    // Phase 2: main bracketing loop.
    loop {
        if bracket.is_valid() {
            return true;
        }
        if bracket.width() < eps_x {
            return false;
        }
        if iterations >= n_max {
            return false;
        }

        if bracket.b.f.noisy_lt(&bracket.a.f) {
            // a.f > b.f > c.f: the minimum lies beyond c, extend right.
            let old_b = bracket.b;
            let old_c = bracket.c;
            let new_c_x = old_b.x + (old_c.x - old_b.x) / IGOLD2;
            let new_c = NoisyIOPair1D::new(new_c_x, g(new_c_x));
            bracket.a = old_b;
            bracket.b = old_c;
            bracket.c = new_c;
        } else {
            // a.f <= b.f: contract towards a, golden-section point.
            let old_a = bracket.a;
            let new_c = bracket.b;
            let new_b_x = old_a.x + (new_c.x - old_a.x) * IGOLD2;
            let new_b = NoisyIOPair1D::new(new_b_x, g(new_b_x));
            bracket.b = new_b;
            bracket.c = new_c;
        }
        iterations += 1;
    }
}
