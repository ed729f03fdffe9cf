// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Conjugate Gradient driver: steepest descent and the three classical
//! beta-update rules, built directly on the 1D line-search kernel.

use crate::core::{Nfm, NfmState};
use crate::error::NfmError;
use crate::function::NoisyFunctionWithGradient;
use crate::linesearch::{multi_line_min, MlmParams};
use crate::noisy::{NoisyGradient, NoisyIOPair};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Which direction-update rule to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum CgMode {
    /// Steepest descent: `d_k = g_k`.
    NoCG,
    /// Fletcher-Reeves.
    FR,
    /// Polak-Ribiere.
    PR,
    /// Polak-Ribiere clamped to `max(0, beta)` ("restart").
    PR0,
}

/// Tunables for [`ConjugateGradient`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct CgConfig {
    pub mode: CgMode,
    pub mlm: MlmParams,
}

impl Default for CgConfig {
    fn default() -> Self {
        CgConfig {
            mode: CgMode::PR0,
            mlm: MlmParams { max_n_bracket: 10, max_n_minimize: 20, ..MlmParams::default() },
        }
    }
}

/// Conjugate-Gradient descent with line search along the conjugate
/// direction. Requires a gradient: the "g_k" used throughout is the
/// *negated* gradient `-grad f(x_k)`, so that `d_k = g_k + beta * d_{k-1}`
/// is always a genuine descent direction.
pub struct ConjugateGradient<'a, F: NoisyFunctionWithGradient> {
    target: &'a F,
    config: CgConfig,
    state: NfmState,
    direction: Option<Vec<f64>>,
    prev_neg_grad: Option<Vec<f64>>,
    step_right: f64,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl<'a, F: NoisyFunctionWithGradient> ConjugateGradient<'a, F> {
    /// Builds a new driver targeting `target`, starting from `x0`.
    ///
    /// The ring buffer that drives stagnation detection defaults to
    /// capacity 1 (effectively disabled): CG termination is normally driven
    /// by the line search making no further progress, not by stagnation.
    pub fn new(target: &'a F, x0: Vec<f64>, config: CgConfig) -> Result<Self, NfmError> {
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
        let mut state = NfmState::new(x0, 1);
        state.f = target.f(&state.x);
        Ok(ConjugateGradient {
            target,
            config,
            state,
            direction: None,
            prev_neg_grad: None,
            step_right: 1.0,
        })
    }

    pub fn set_x(&mut self, x: Vec<f64>) {
        self.state.f = self.target.f(&x);
        self.state.x = x;
        self.direction = None;
        self.prev_neg_grad = None;
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

    fn beta(&self, neg_grad: &[f64]) -> f64 {
        let prev = match &self.prev_neg_grad {
            Some(p) => p,
            None => return 0.0,
        };
        let denom = dot(prev, prev);
        if denom == 0.0 {
            return 0.0;
        }
        match self.config.mode {
            CgMode::NoCG => 0.0,
            CgMode::FR => dot(neg_grad, neg_grad) / denom,
            CgMode::PR => {
                let diff: Vec<f64> = neg_grad.iter().zip(prev.iter()).map(|(a, b)| a - b).collect();
                dot(neg_grad, &diff) / denom
            }
            CgMode::PR0 => {
                let diff: Vec<f64> = neg_grad.iter().zip(prev.iter()).map(|(a, b)| a - b).collect();
                (dot(neg_grad, &diff) / denom).max(0.0)
            }
        }
    }
}

impl<'a, F: NoisyFunctionWithGradient> Nfm for ConjugateGradient<'a, F> {
    fn state(&self) -> &NfmState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NfmState {
        &mut self.state
    }

    fn find_min_inner(&mut self) -> NoisyIOPair {
        self.direction = None;
        self.prev_neg_grad = None;
        self.step_right = 1.0;

        loop {
            self.state.store_last_value(self.state.f);
            if self.state.should_stop() {
                break;
            }

            let mut grad = NoisyGradient::new(vec![0.0; self.target.ndim()]);
            self.state.f = self.target.fgrad(&self.state.x, &mut grad);
            self.state.record_f_eval();
            self.state.record_grad_eval();
            self.state.set_last_gradient(grad.clone());

            let neg_grad: Vec<f64> = grad.val.iter().map(|g| -g).collect();
            let beta = self.beta(&neg_grad);
            let direction = match &self.direction {
                Some(prev_d) => neg_grad
                    .iter()
                    .zip(prev_d.iter())
                    .map(|(g, d)| g + beta * d)
                    .collect::<Vec<_>>(),
                None => neg_grad.clone(),
            };

            let p0 = NoisyIOPair::new(self.state.x.clone(), self.state.f);
            let mlm = MlmParams { step_left: 0.0, step_right: self.step_right, ..self.config.mlm };
            let result = multi_line_min(self.target, &p0, &direction, &mlm)
                .expect("step_left is fixed at 0.0 and step_right stays positive by construction");

            let made_progress = result.x != p0.x;
            if !made_progress {
                self.state.x = result.x;
                self.state.f = result.f;
                break;
            }

            let dir_norm2 = dot(&direction, &direction);
            let t_used = if dir_norm2 > 0.0 {
                let delta: Vec<f64> =
                    result.x.iter().zip(p0.x.iter()).map(|(a, b)| a - b).collect();
                dot(&delta, &direction) / dir_norm2
            } else {
                0.0
            };
            self.step_right = t_used.abs().max(1e-8) * 1.2;

            self.state.x = result.x;
            self.state.f = result.f;
            self.direction = Some(direction);
            self.prev_neg_grad = Some(neg_grad);
            self.state.iteration += 1;
        }

        NoisyIOPair::new(self.state.x.clone(), self.state.f)
    }
}
