// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Concrete multi-dimensional minimization drivers.

mod adam;
mod conjugategradient;
mod fire;
mod irene;

pub use adam::{Adam, AdamConfig};
pub use conjugategradient::{CgConfig, CgMode, ConjugateGradient};
pub use fire::{Fire, FireConfig, FreezeMode};
pub use irene::Irene;
