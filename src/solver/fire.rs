// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! FIRE driver: Fast Inertial Relaxation Engine, a damped
//! molecular-dynamics relaxation with adaptive time step.

use crate::core::{Nfm, NfmState};
use crate::error::NfmError;
use crate::function::NoisyFunctionWithGradient;
use crate::md::{Integrator, MDView};
use crate::noisy::{NoisyGradient, NoisyIOPair};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Which components get zeroed when the trajectory turns uphill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum FreezeMode {
    /// Zero the entire velocity vector.
    Full,
    /// Zero only components where acceleration and velocity disagree in
    /// sign.
    Selective,
}

/// Tunables for [`Fire`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct FireConfig {
    pub dt0: f64,
    pub dtmax: f64,
    pub dtmin: f64,
    pub nmin: u32,
    pub finc: f64,
    pub fdec: f64,
    pub alpha0: f64,
    pub falpha: f64,
    pub freeze: FreezeMode,
    pub integrator: Integrator,
    /// Per-component inverse masses; `None` means all ones.
    pub mi: Option<Vec<f64>>,
    /// Stop after this many consecutive steps at `dtmin`. `None` disables.
    pub n_dt_min: Option<u32>,
}

impl Default for FireConfig {
    fn default() -> Self {
        FireConfig {
            dt0: 0.1,
            dtmax: 1.0,
            dtmin: 0.0,
            nmin: 5,
            finc: 1.1,
            fdec: 0.5,
            alpha0: 0.1,
            falpha: 0.99,
            freeze: FreezeMode::Full,
            integrator: Integrator::VerletV,
            mi: None,
            n_dt_min: None,
        }
    }
}

pub struct Fire<'a, F: NoisyFunctionWithGradient> {
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

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl<'a, F: NoisyFunctionWithGradient> Fire<'a, F> {
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
        Ok(Fire {
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

impl<'a, F: NoisyFunctionWithGradient> Nfm for Fire<'a, F> {
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
            let p = dot(&force, &self.v);

            let norm_v = norm(&self.v);
            let norm_f = norm(&force);
            if norm_f > 0.0 {
                for i in 0..ndim {
                    self.v[i] = (1.0 - self.alpha) * self.v[i]
                        + self.alpha * norm_v * force[i] / norm_f;
                }
            }

            if p > 0.0 {
                self.n_pos += 1;
                if self.n_pos > self.config.nmin {
                    self.dt = (self.dt * self.config.finc).min(self.config.dtmax);
                    self.alpha *= self.config.falpha;
                }
            } else if p < 0.0 {
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
                            if a[i] * self.v[i] < 0.0 {
                                self.v[i] = 0.0;
                            }
                        }
                    }
                }
            }

            let target = self.target;
            let mi = self.config.mi.clone();
            let mut recompute = |x: &[f64], a_out: &mut [f64]| {
                let mut g = NoisyGradient::new(vec![0.0; x.len()]);
                target.grad(x, &mut g);
                for i in 0..x.len() {
                    let mi_i = mi.as_ref().map_or(1.0, |m| m[i]);
                    a_out[i] = -g.val[i] * mi_i;
                }
                grad.val = g.val;
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
    use crate::noisy::NoisyValue;

    struct Quartic3D;
    impl NoisyFunction for Quartic3D {
        fn ndim(&self) -> usize {
            3
        }
        fn f(&self, x: &[f64]) -> NoisyValue {
            let (a, b, c) = (x[0] - 1.0, x[1] + 1.5, x[2] - 0.5);
            NoisyValue::new(a.powi(4) + b.powi(4) + c.powi(4), 0.0)
        }
    }
    impl NoisyFunctionWithGradient for Quartic3D {
        fn grad(&self, x: &[f64], out: &mut NoisyGradient) {
            out.val[0] = 4.0 * (x[0] - 1.0).powi(3);
            out.val[1] = 4.0 * (x[1] + 1.5).powi(3);
            out.val[2] = 4.0 * (x[2] - 0.5).powi(3);
        }
    }

    crate::send_sync_test!(fire_is_send, Fire<'static, Quartic3D>);

    #[test]
    fn converges_with_velocity_verlet() {
        let f = Quartic3D;
        let config = FireConfig { dtmax: 1.0, ..FireConfig::default() };
        let mut fire = Fire::new(&f, vec![-2.0, 1.0, 0.0], config).unwrap();
        fire.set_max_n_iterations(2000);
        let result = fire.find_min();
        let target = [1.0, -1.5, 0.5];
        for i in 0..3 {
            assert!((result.x[i] - target[i]).abs() < 0.05, "component {i}: {:?}", result.x);
        }
    }

    #[test]
    fn converges_with_euler() {
        let f = Quartic3D;
        let config =
            FireConfig { dtmax: 1.0, integrator: Integrator::EulerE, ..FireConfig::default() };
        let mut fire = Fire::new(&f, vec![-2.0, 1.0, 0.0], config).unwrap();
        fire.set_max_n_iterations(2000);
        let result = fire.find_min();
        let target = [1.0, -1.5, 0.5];
        for i in 0..3 {
            assert!((result.x[i] - target[i]).abs() < 0.05, "component {i}: {:?}", result.x);
        }
    }

    #[test]
    fn aggressive_dt_schedule_stops_early_and_fails_tolerance() {
        let f = Quartic3D;
        let config = FireConfig {
            dtmax: 0.25,
            dt0: 0.2,
            dtmin: 0.15,
            n_dt_min: Some(1),
            ..FireConfig::default()
        };
        let mut fire = Fire::new(&f, vec![-2.0, 1.0, 0.0], config).unwrap();
        fire.set_max_n_iterations(2000);
        let result = fire.find_min();
        let target = [1.0, -1.5, 0.5];
        let max_err = (0..3).map(|i| (result.x[i] - target[i]).abs()).fold(0.0, f64::max);
        assert!(max_err >= 0.05, "expected the aggressive schedule to fail tolerance, got {max_err}");
    }

    #[test]
    fn rejects_bad_dt_ordering() {
        let f = Quartic3D;
        let config = FireConfig { dtmin: 1.0, dt0: 0.5, dtmax: 2.0, ..FireConfig::default() };
        let err = Fire::new(&f, vec![0.0, 0.0, 0.0], config);
        assert!(matches!(err, Err(NfmError::InvalidArgument(_))));
    }
}
