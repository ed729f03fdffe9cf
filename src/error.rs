// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types returned by this crate.

/// The closed set of failure modes this crate can produce.
///
/// Runtime outcomes that are not programmer errors (bracket not found, no
/// progress along a line, gradient indistinguishable from noise) are *not*
/// represented here; they are signaled through return values (see the
/// `findBracket`/`multiLineMin`/`find_min` documentation).
#[derive(Debug, thiserror::Error)]
pub enum NfmError {
    /// Bracket preconditions were violated (ordering, or the
    /// `a.f > b.f < c.f` invariant after bracketing).
    #[error("invalid bracket: {0}")]
    InvalidBracket(String),
    /// Vector sizes are inconsistent between function, position, direction
    /// or masses.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// An argument is out of its valid domain (negative step, `ndim == 0`,
    /// empty gradient where required, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A driver that requires gradients was constructed with a
    /// gradient-less target function.
    #[error("missing gradient: {0}")]
    MissingGradient(String),
}
