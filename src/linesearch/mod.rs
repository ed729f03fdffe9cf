// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The 1D line-search kernel: restricting a function to a line,
//! bracketing a minimum, and Brent-minimizing within the bracket.

pub mod consts;
mod bracket;
mod brent;
mod multi;
mod projection;

pub use bracket::find_bracket;
pub use brent::brent_min;
pub use multi::{multi_line_min, MlmParams};
pub use projection::FunProjection1D;
