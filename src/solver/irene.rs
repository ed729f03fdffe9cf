// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! IRENE driver: FIRE with the `P = v.a` scalar product treated as a
//! noisy value rather than a plain scalar.

use super::fire::{FireConfig, FreezeMode};
use crate::core::{Nfm, NfmState};
use crate::error::NfmError;
use crate::function::NoisyFunctionWithGradient;
use crate::md::MDView;
use crate::noisy::{NoisyGradient, NoisyIOPair, NoisyValue};

pub struct Irene<'a, F: NoisyFunctionWithGradient> {
    target: &'a F,
    config: FireConfig,
    state: NfmState,
    v: Vec<f64>,
    dt: f64,
    alpha: f64,
    n_pos: u32,
    n_min_count: u32,
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

impl<'a, F: NoisyFunctionWithGradient> Irene<'a, F> {
    pub fn new(target: &'a F, x0: Vec<f64>, config: FireConfig) -> Result<Self, NfmError> {
        if x0.is_empty() {
            return Err(NfmError::InvalidArgument("x0 must be non-empty".into()));
        }
        if x0.len() != target.ndim() {
            return Err(NfmError::DimensionMismatch(format!(
                "x0 has {} components, target expects {}",
                x0.len(),
                target.ndim()
            )));
        }
        if !(0.0 <= config.dtmin && config.dtmin <= config.dt0 && config.dt0 <= config.dtmax) {
            return Err(NfmError::InvalidArgument(
                "FireConfig requires 0 <= dtmin <= dt0 <= dtmax".into(),
            ));
        }
        if let Some(mi) = &config.mi {
            if mi.len() != x0.len() {
                return Err(NfmError::DimensionMismatch(
                    "mi length must match x0 length".into(),
                ));
            }
        }
        let ndim = x0.len();
        let mut state = NfmState::new(x0, 20);
        state.f = target.f(&state.x);
        let dt0 = config.dt0;
        let alpha0 = config.alpha0;
        Ok(Irene {
            target,
            config,
            state,
            v: vec![0.0; ndim],
            dt: dt0,
            alpha: alpha0,
            n_pos: 0,
            n_min_count: 0,
        })
    }

    pub fn set_x(&mut self, x: Vec<f64>) {
        self.state.f = self.target.f(&x);
        self.state.x = x;
    }

    pub fn get_x(&self) -> &[f64] {
        &self.state.x
    }

    pub fn get_f(&self) -> crate::noisy::NoisyValue {
        self.state.f
    }

    pub fn set_eps_x(&mut self, v: f64) {
        self.state.eps_x = v;
    }

    pub fn set_eps_f(&mut self, v: f64) {
        self.state.eps_f = v;
    }

    pub fn set_max_n_const_values(&mut self, n: usize) {
        self.state.set_max_n_const_values(n);
    }

    pub fn set_max_n_iterations(&mut self, n: usize) {
        self.state.max_n_iterations = n;
    }

    pub fn get_func_counts(&self) -> (u64, u64) {
        self.state.get_func_counts()
    }

    fn mi_at(&self, i: usize) -> f64 {
        self.config.mi.as_ref().map_or(1.0, |m| m[i])
    }

    fn acceleration(&self, grad: &[f64]) -> Vec<f64> {
        (0..grad.len()).map(|i| -grad[i] * self.mi_at(i)).collect()
    }
}

impl<'a, F: NoisyFunctionWithGradient> Nfm for Irene<'a, F> {
    fn state(&self) -> &NfmState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NfmState {
        &mut self.state
    }

    fn find_min_inner(&mut self) -> NoisyIOPair {
        let ndim = self.target.ndim();
        self.v = vec![0.0; ndim];
        self.dt = self.config.dt0;
        self.alpha = self.config.alpha0;
        self.n_pos = 0;
        self.n_min_count = 0;

        let mut grad = NoisyGradient::new(vec![0.0; ndim]);
        self.state.f = self.target.fgrad(&self.state.x, &mut grad);
        self.state.record_f_eval();
        self.state.record_grad_eval();
        let mut a = self.acceleration(&grad.val);

        loop {
            self.state.store_last_value(self.state.f);
            self.state.set_last_gradient(grad.clone());
            if self.state.should_stop() {
                break;
            }

            let force: Vec<f64> = grad.val.iter().map(|g| -g).collect();
            let grad_err = |i: usize| grad.err.as_ref().map_or(0.0, |e| e[i]);

            // P as a noisy value: value = v.a, error from quadrature of the
            // mass-scaled acceleration's per-component error scaled by the
            // (exact) velocity.
            let p_value: f64 = a.iter().zip(self.v.iter()).map(|(ai, v)| ai * v).sum();
            let p_error = (0..ndim)
                .map(|i| (self.v[i] * grad_err(i) * self.mi_at(i).abs()).powi(2))
                .sum::<f64>()
                .sqrt();
            let p = NoisyValue::new(p_value, p_error);

            let norm_v = norm(&self.v);
            let norm_f = norm(&force);
            if norm_f > 0.0 {
                for i in 0..ndim {
                    self.v[i] = (1.0 - self.alpha) * self.v[i]
                        + self.alpha * norm_v * force[i] / norm_f;
                }
            }

            if p.scalar_gt(0.0) {
                self.n_pos += 1;
                if self.n_pos > self.config.nmin {
                    self.dt = (self.dt * self.config.finc).min(self.config.dtmax);
                    self.alpha *= self.config.falpha;
                }
            } else if p.scalar_lt(0.0) {
                self.n_pos = 0;
                self.dt = (self.dt * self.config.fdec).max(self.config.dtmin);
                self.alpha = self.config.alpha0;
                match self.config.freeze {
                    FreezeMode::Full => {
                        for vi in self.v.iter_mut() {
                            *vi = 0.0;
                        }
                    }
                    FreezeMode::Selective => {
                        for i in 0..ndim {
                            let a_err = grad_err(i) * self.mi_at(i).abs();
                            let av = NoisyValue::new(a[i] * self.v[i], self.v[i].abs() * a_err);
                            if av.scalar_lt(0.0) {
                                self.v[i] = 0.0;
                            }
                        }
                    }
                }
            }
            // p.scalar_eq(0.0): indistinguishable from zero, do nothing.

            let target = self.target;
            let mi = self.config.mi.clone();
            let mut recompute = |x: &[f64], a_out: &mut [f64]| {
                let mut g = NoisyGradient::new(vec![0.0; x.len()]);
                target.grad(x, &mut g);
                for i in 0..x.len() {
                    let mi_i = mi.as_ref().map_or(1.0, |m| m[i]);
                    a_out[i] = -g.val[i] * mi_i;
                }
                grad.val = g.val.clone();
                grad.err = g.err.clone();
            };
            let mut view = MDView { x: &mut self.state.x, v: &mut self.v, a: &mut a };
            view.step(self.dt, self.config.integrator, &mut recompute);
            self.state.record_grad_eval();

            self.state.f = self.target.f(&self.state.x);
            self.state.record_f_eval();

            if self.dt == self.config.dtmin {
                self.n_min_count += 1;
                if let Some(n_dt_min) = self.config.n_dt_min {
                    if n_dt_min > 0 && self.n_min_count >= n_dt_min {
                        self.state.iteration += 1;
                        break;
                    }
                }
            } else {
                self.n_min_count = 0;
            }

            self.state.iteration += 1;
        }

        NoisyIOPair::new(self.state.x.clone(), self.state.f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::NoisyFunction;
    use crate::noisy::NoisyValue as NV;

    struct Quartic3D;
    impl NoisyFunction for Quartic3D {
        fn ndim(&self) -> usize {
            3
        }
        fn f(&self, x: &[f64]) -> NV {
            let (a, b, c) = (x[0] - 1.0, x[1] + 1.5, x[2] - 0.5);
            NV::new(a.powi(4) + b.powi(4) + c.powi(4), 0.0)
        }
    }
    impl NoisyFunctionWithGradient for Quartic3D {
        fn grad(&self, x: &[f64], out: &mut NoisyGradient) {
            out.val[0] = 4.0 * (x[0] - 1.0).powi(3);
            out.val[1] = 4.0 * (x[1] + 1.5).powi(3);
            out.val[2] = 4.0 * (x[2] - 0.5).powi(3);
        }
    }

    crate::send_sync_test!(irene_is_send, Irene<'static, Quartic3D>);

    #[test]
    fn converges_like_fire_without_noise() {
        let f = Quartic3D;
        let config = FireConfig { dtmax: 1.0, ..FireConfig::default() };
        let mut irene = Irene::new(&f, vec![-2.0, 1.0, 0.0], config).unwrap();
        irene.set_max_n_iterations(2000);
        let result = irene.find_min();
        let target = [1.0, -1.5, 0.5];
        for i in 0..3 {
            assert!((result.x[i] - target[i]).abs() < 0.05, "component {i}: {:?}", result.x);
        }
    }

    #[test]
    fn converges_with_nonuniform_mass_scaling() {
        // Per-component mi != 1 forces P's mass-scaled value/error to diverge
        // numerically from the unscaled force/gradient error; this exercises
        // the `a`/`mi`-scaled computation rather than the raw gradient.
        let f = Quartic3D;
        let config = FireConfig {
            dtmax: 0.5,
            mi: Some(vec![1.5, 0.75, 2.0]),
            ..FireConfig::default()
        };
        let mut irene = Irene::new(&f, vec![-2.0, 1.0, 0.0], config).unwrap();
        irene.set_max_n_iterations(4000);
        let result = irene.find_min();
        let target = [1.0, -1.5, 0.5];
        for i in 0..3 {
            assert!((result.x[i] - target[i]).abs() < 0.05, "component {i}: {:?}", result.x);
        }
    }
}
