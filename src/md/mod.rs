// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Molecular-dynamics integrators, used by FIRE and IRENE to advance
//! `(x, v, a)` one time step.

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Which integration scheme a relaxation driver advances its trajectory
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Integrator {
    /// Explicit Euler: `v += dt*a; x += dt*v`, one acceleration recompute.
    EulerE,
    /// Velocity-Verlet: `v += dt/2*a; x += dt*v; recompute a; v += dt/2*a`.
    VerletV,
}

/// A view onto the position/velocity/acceleration vectors of a single MD
/// step, borrowed for the duration of that step.
pub struct MDView<'a> {
    pub x: &'a mut [f64],
    pub v: &'a mut [f64],
    pub a: &'a mut [f64],
}

impl<'a> MDView<'a> {
    /// Advances `(x, v, a)` by one step of size `dt` under `integrator`.
    /// `recompute_a` recomputes the acceleration vector from the current
    /// position.
    pub fn step(&mut self, dt: f64, integrator: Integrator, recompute_a: &mut impl FnMut(&[f64], &mut [f64])) {
        match integrator {
            Integrator::EulerE => {
                for i in 0..self.x.len() {
                    self.v[i] += dt * self.a[i];
                    self.x[i] += dt * self.v[i];
                }
                recompute_a(self.x, self.a);
            }
            Integrator::VerletV => {
                for i in 0..self.x.len() {
                    self.v[i] += 0.5 * dt * self.a[i];
                    self.x[i] += dt * self.v[i];
                }
                recompute_a(self.x, self.a);
                for i in 0..self.x.len() {
                    self.v[i] += 0.5 * dt * self.a[i];
                }
            }
        }
    }
}
