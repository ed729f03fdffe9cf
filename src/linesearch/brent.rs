// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `brentMin`: noise-aware Brent minimization over a valid bracket.

use crate::error::NfmError;
use crate::noisy::{NoisyBracket, NoisyIOPair1D, NoisyValue};

const CGOLD: f64 = 0.381_966_011_250_105; // 1 - 1/GOLDEN, the golden-section fallback fraction
const ZEPS: f64 = 1e-10;

fn shift_sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

/// Runs Brent's method (parabolic interpolation with golden-section
/// fallback) inside `bracket`, returning the best point found.
///
/// `bracket` is taken by value: internally mutated, never mutated in the
/// caller's copy. Fails with [`NfmError::InvalidBracket`] if the incoming
/// bracket does not already satisfy the bracketing invariant.
///
/// The returned point is the one with the smallest upper confidence bound
/// among the five points tracked during the search (`m`, `v`, `w`, and the
/// bracket's evolving lower/upper endpoints) — a conservative choice that
/// favors points whose pessimistic estimate is best.
pub fn brent_min(
    g: &mut impl FnMut(f64) -> NoisyValue,
    bracket: NoisyBracket,
    n_max: usize,
    eps_x: f64,
    eps_f: f64,
) -> Result<NoisyIOPair1D, NfmError> {
    if !bracket.is_valid() {
        return Err(NfmError::InvalidBracket(format!(
            "brent_min requires a < b < c with a.f > b.f < c.f (noisy), got {}",
            bracket
        )));
    }

    let mut lo = NoisyIOPair1D::new(bracket.a.x, bracket.a.f);
    let mut hi = NoisyIOPair1D::new(bracket.c.x, bracket.c.f);

    let mut m = bracket.b; // x: current best
    let mut w = bracket.b; // second best
    let mut v = bracket.b; // previous w

    let mut e = 0.0_f64;
    let mut d = 0.0_f64;

    for _ in 0..n_max {
        let (lo_x, hi_x) = (lo.x.min(hi.x), lo.x.max(hi.x));
        let xm = 0.5 * (lo_x + hi_x);

        // Early exit (a): mixed relative/absolute bracket-width tolerance.
        let mixed_tol = eps_x * 0.5 * (lo_x + hi_x).abs() + eps_x;
        if (hi_x - lo_x) < mixed_tol {
            break;
        }
        // Early exit (b): noise-corrected gap between the central point and
        // the best adjacent point.
        let gap = (m.f.value - w.f.value).abs() - m.f.error - w.f.error;
        if gap < eps_f {
            break;
        }

        let tol1 = eps_x * m.x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;

        let mut use_golden = true;
        if e.abs() > tol1 {
            let r = (m.x - w.x) * (m.f.value - v.f.value);
            let q0 = (m.x - v.x) * (m.f.value - w.f.value);
            let mut p = (m.x - v.x) * q0 - (m.x - w.x) * r;
            let mut q = 2.0 * (q0 - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let etemp = e;
            e = d;
            if p.abs() < (0.5 * q * etemp).abs() && p > q * (lo_x - m.x) && p < q * (hi_x - m.x) {
                d = p / q;
                let u = m.x + d;
                if (u - lo_x) < tol2 || (hi_x - u) < tol2 {
                    d = shift_sign(tol1, xm - m.x);
                }
                use_golden = false;
            }
        }
        if use_golden {
            e = if m.x >= xm { lo_x - m.x } else { hi_x - m.x };
            d = CGOLD * e;
        }

        let u_x = if d.abs() >= tol1 { m.x + d } else { m.x + shift_sign(tol1, d) };
        let u = NoisyIOPair1D::new(u_x, g(u_x));

        if u.f.noisy_le(&m.f) {
            if u.x >= m.x {
                lo = m;
            } else {
                hi = m;
            }
            v = w;
            w = m;
            m = u;
        } else {
            if u.x < m.x {
                lo = u;
            } else {
                hi = u;
            }
            if u.f.noisy_le(&w.f) || w.x == m.x {
                v = w;
                w = u;
            } else if u.f.noisy_le(&v.f) || v.x == m.x || v.x == w.x {
                v = u;
            }
        }
    }

    let candidates = [m, v, w, lo, hi];
    let best = candidates
        .into_iter()
        .min_by(|p, q| p.f.upper_bound().partial_cmp(&q.f.upper_bound()).unwrap())
        .unwrap();
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quartic(x: f64) -> NoisyValue {
        let d = x - 1.0;
        NoisyValue::new(d * d * d * d, 0.0)
    }

    #[test]
    fn minimizes_quartic_within_tolerance() {
        let mut g = quartic;
        let bracket = NoisyBracket::new(
            NoisyIOPair1D::new(-1.0, g(-1.0)),
            NoisyIOPair1D::new(0.5, g(0.5)),
            NoisyIOPair1D::new(2.0, g(2.0)),
        );
        let result = brent_min(&mut g, bracket, 100, 1e-6, 1e-10).unwrap();
        assert!((result.x - 1.0).abs() < 0.01);
    }

    #[test]
    fn rejects_invalid_bracket() {
        let mut g = quartic;
        let bad = NoisyBracket::new(
            NoisyIOPair1D::new(-1.0, NoisyValue::new(0.0, 0.0)),
            NoisyIOPair1D::new(0.5, NoisyValue::new(1.0, 0.0)),
            NoisyIOPair1D::new(2.0, NoisyValue::new(2.0, 0.0)),
        );
        let err = brent_min(&mut g, bad, 100, 1e-6, 1e-10);
        assert!(matches!(err, Err(NfmError::InvalidBracket(_))));
    }
}
