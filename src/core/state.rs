// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Shared state every NFM driver embeds: current position/value, the
//! stagnation ring buffer, evaluation counters and the stopping policy.

use crate::noisy::{NoisyGradient, NoisyValue};
use crate::observers::LogSink;
use std::collections::VecDeque;

/// The record shared by all concrete drivers, embedded in each rather than
/// inherited from a common base.
pub struct NfmState {
    pub x: Vec<f64>,
    pub f: NoisyValue,
    ring: VecDeque<NoisyValue>,
    ring_cap: usize,
    pub eps_x: f64,
    pub eps_f: f64,
    pub max_n_iterations: usize,
    pub flag_grad_err_stop: bool,
    pub iteration: usize,
    pub n_f_evals: u64,
    pub n_grad_evals: u64,
    last_grad: Option<NoisyGradient>,
    pub log: Option<LogSink>,
}

impl NfmState {
    /// Builds initial state at `x0`, with no function value yet recorded
    /// (`f` starts at the default `NoisyValue`, overwritten on the first
    /// evaluation).
    pub fn new(x0: Vec<f64>, ring_cap: usize) -> Self {
        NfmState {
            x: x0,
            f: NoisyValue::default(),
            ring: VecDeque::with_capacity(ring_cap.max(1)),
            ring_cap,
            eps_x: crate::linesearch::consts::STD_XTOL,
            eps_f: crate::linesearch::consts::STD_FTOL,
            max_n_iterations: 1000,
            flag_grad_err_stop: false,
            iteration: 0,
            n_f_evals: 0,
            n_grad_evals: 0,
            last_grad: None,
            log: None,
        }
    }

    /// Resets all transient state (ring buffer, iteration counter,
    /// evaluation counters, last gradient) so the same driver instance can
    /// be reused for a fresh `find_min` call. Position `x` and configuration
    /// are left untouched.
    pub fn reset(&mut self) {
        self.ring.clear();
        self.iteration = 0;
        self.n_f_evals = 0;
        self.n_grad_evals = 0;
        self.last_grad = None;
    }

    pub fn get_func_counts(&self) -> (u64, u64) {
        (self.n_f_evals, self.n_grad_evals)
    }

    pub fn record_f_eval(&mut self) {
        self.n_f_evals += 1;
    }

    pub fn record_grad_eval(&mut self) {
        self.n_grad_evals += 1;
    }

    pub fn set_max_n_const_values(&mut self, n: usize) {
        self.ring_cap = n;
        self.ring = VecDeque::with_capacity(n.max(1));
    }

    pub fn set_last_gradient(&mut self, g: NoisyGradient) {
        self.last_grad = Some(g);
    }

    pub fn last_gradient(&self) -> Option<&NoisyGradient> {
        self.last_grad.as_ref()
    }

    /// Pushes a freshly observed value onto the stagnation ring buffer,
    /// evicting the oldest entry once `ring_cap` is reached. A `ring_cap` of
    /// zero disables the buffer (stagnation is never detected).
    pub fn store_last_value(&mut self, v: NoisyValue) {
        if self.ring_cap == 0 {
            return;
        }
        if self.ring.len() >= self.ring_cap {
            self.ring.pop_front();
        }
        self.ring.push_back(v);
    }

    /// True once the ring buffer is full and every entry is noisily equal to
    /// the newest one.
    fn stagnated(&self) -> bool {
        if self.ring_cap == 0 || self.ring.len() < self.ring_cap {
            return false;
        }
        let newest = *self.ring.back().unwrap();
        self.ring.iter().all(|v| v.noisy_eq(&newest))
    }

    /// Whether the driver should stop: iteration budget exhausted, the
    /// recent-values buffer has stagnated, or (when enabled) the most recent
    /// gradient is no longer meaningful.
    pub fn should_stop(&self) -> bool {
        if self.max_n_iterations > 0 && self.iteration >= self.max_n_iterations {
            return true;
        }
        if self.stagnated() {
            return true;
        }
        if self.flag_grad_err_stop {
            if let Some(g) = &self.last_grad {
                if !g.is_meaningful() {
                    return true;
                }
            }
        }
        false
    }
}
