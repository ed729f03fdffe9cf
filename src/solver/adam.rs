// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Adam driver: first/second-moment gradient descent with bias
//! correction, optional AMSGrad, and optional exponential parameter
//! averaging.

use crate::core::{Nfm, NfmState};
use crate::error::NfmError;
use crate::function::NoisyFunctionWithGradient;
use crate::noisy::{NoisyGradient, NoisyIOPair};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Tunables for [`Adam`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct AdamConfig {
    pub alpha: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub eps: f64,
    pub use_averaging: bool,
    pub use_amsgrad: bool,
}

impl Default for AdamConfig {
    fn default() -> Self {
        AdamConfig {
            alpha: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            use_averaging: false,
            use_amsgrad: false,
        }
    }
}

pub struct Adam<'a, F: NoisyFunctionWithGradient> {
    target: &'a F,
    config: AdamConfig,
    state: NfmState,
    m: Vec<f64>,
    v: Vec<f64>,
    v_hat: Vec<f64>,
    x_avg: Vec<f64>,
    t: u64,
}

impl<'a, F: NoisyFunctionWithGradient> Adam<'a, F> {
    pub fn new(target: &'a F, x0: Vec<f64>, config: AdamConfig) -> Result<Self, NfmError> {
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
        let ndim = x0.len();
        let mut state = NfmState::new(x0, 20);
        state.f = target.f(&state.x);
        let x_avg = state.x.clone();
        Ok(Adam {
            target,
            config,
            state,
            m: vec![0.0; ndim],
            v: vec![0.0; ndim],
            v_hat: vec![0.0; ndim],
            x_avg,
            t: 0,
        })
    }

    pub fn set_x(&mut self, x: Vec<f64>) {
        self.state.f = self.target.f(&x);
        self.x_avg = x.clone();
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
}

impl<'a, F: NoisyFunctionWithGradient> Nfm for Adam<'a, F> {
    fn state(&self) -> &NfmState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NfmState {
        &mut self.state
    }

    fn find_min_inner(&mut self) -> NoisyIOPair {
        let ndim = self.target.ndim();
        self.m = vec![0.0; ndim];
        self.v = vec![0.0; ndim];
        self.v_hat = vec![0.0; ndim];
        self.x_avg = self.state.x.clone();
        self.t = 0;

        loop {
            self.state.store_last_value(self.state.f);
            if self.state.should_stop() {
                break;
            }

            let mut grad = NoisyGradient::new(vec![0.0; ndim]);
            self.state.f = self.target.fgrad(&self.state.x, &mut grad);
            self.state.record_f_eval();
            self.state.record_grad_eval();
            self.state.set_last_gradient(grad.clone());

            self.t += 1;
            let t = self.t as i32;
            let bias1 = 1.0 - self.config.beta1.powi(t);
            let bias2 = 1.0 - self.config.beta2.powi(t);
            let scale = bias2.sqrt() / bias1;

            for i in 0..ndim {
                let g = grad.val[i];
                self.m[i] = self.config.beta1 * self.m[i] + (1.0 - self.config.beta1) * g;
                self.v[i] = self.config.beta2 * self.v[i] + (1.0 - self.config.beta2) * g * g;
                let denom = if self.config.use_amsgrad {
                    self.v_hat[i] = self.v_hat[i].max(self.v[i]);
                    self.v_hat[i].sqrt()
                } else {
                    self.v[i].sqrt()
                };
                let dx = -self.config.alpha * scale * self.m[i] / (denom + self.config.eps);
                self.state.x[i] += dx;
            }

            if self.config.use_averaging {
                for i in 0..ndim {
                    self.x_avg[i] = self.config.beta2 * self.x_avg[i]
                        + (1.0 - self.config.beta2) * self.state.x[i];
                }
            }

            self.state.f = self.target.f(&self.state.x);
            self.state.record_f_eval();
            self.state.iteration += 1;
        }

        if self.config.use_averaging && self.t > 0 {
            let bias2 = 1.0 - self.config.beta2.powi(self.t as i32);
            for i in 0..ndim {
                self.state.x[i] = self.x_avg[i] / bias2;
            }
            self.state.f = self.target.f(&self.state.x);
            self.state.record_f_eval();
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

    crate::send_sync_test!(adam_is_send, Adam<'static, Quartic3D>);

    #[test]
    fn converges_with_each_config() {
        let f = Quartic3D;
        for use_amsgrad in [false, true] {
            for use_averaging in [false, true] {
                let config = AdamConfig {
                    alpha: 0.1,
                    beta1: 0.1,
                    beta2: 0.1,
                    use_amsgrad,
                    use_averaging,
                    ..AdamConfig::default()
                };
                let mut adam = Adam::new(&f, vec![-2.0, 1.0, 0.0], config).unwrap();
                adam.set_max_n_const_values(100);
                adam.set_max_n_iterations(5000);
                let result = adam.find_min();
                let target = [1.0, -1.5, 0.5];
                for i in 0..3 {
                    assert!(
                        (result.x[i] - target[i]).abs() < 0.1,
                        "amsgrad={use_amsgrad} averaging={use_averaging} component {i}: {:?}",
                        result.x
                    );
                }
            }
        }
    }

    #[test]
    fn zero_betas_reduce_to_signed_gradient_step() {
        // beta1 = beta2 = 0: m_i = g_i, v_i = g_i^2, so
        // dx_i = -alpha * 1 * g_i / (|g_i| + eps) ~= -alpha * sign(g_i).
        struct Linear;
        impl NoisyFunction for Linear {
            fn ndim(&self) -> usize {
                1
            }
            fn f(&self, x: &[f64]) -> NoisyValue {
                NoisyValue::new(3.0 * x[0], 0.0)
            }
        }
        impl NoisyFunctionWithGradient for Linear {
            fn grad(&self, _x: &[f64], out: &mut NoisyGradient) {
                out.val[0] = 3.0;
            }
        }
        let f = Linear;
        let config = AdamConfig { alpha: 0.1, beta1: 0.0, beta2: 0.0, ..AdamConfig::default() };
        let mut adam = Adam::new(&f, vec![0.0], config).unwrap();
        adam.set_max_n_iterations(1);
        adam.set_max_n_const_values(0);
        let result = adam.find_min();
        assert!((result.x[0] - (-0.1)).abs() < 1e-6);
    }
}
