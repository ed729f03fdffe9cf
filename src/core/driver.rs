// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `Nfm` template method: common setup/teardown around each concrete
//! driver's minimization loop.

use super::state::NfmState;
use crate::noisy::NoisyIOPair;
use crate::observers::global_logger;

/// Implemented by every concrete minimization driver. `find_min` is the
/// non-virtual wrapper (reset transient state, log a start/end banner);
/// `find_min_inner` is the hook each driver provides with its own loop.
pub trait Nfm {
    fn state(&self) -> &NfmState;
    fn state_mut(&mut self) -> &mut NfmState;

    /// Runs the driver's minimization loop. Callable again after it
    /// returns: all transient state is reset at the start of every call.
    fn find_min(&mut self) -> NoisyIOPair {
        self.state_mut().reset();
        let sink = self.state().log.clone().or_else(global_logger);
        if let Some(sink) = &sink {
            sink.log_vector("findMin start, x0", &self.state().x);
        }
        let result = self.find_min_inner();
        if let Some(sink) = &sink {
            sink.log_pair("findMin done", &result);
        }
        result
    }

    /// The driver-specific minimization loop. Implementors are responsible
    /// for calling `state_mut().should_stop()` each iteration and for
    /// pushing observed values onto the ring buffer via
    /// `state_mut().store_last_value`.
    fn find_min_inner(&mut self) -> NoisyIOPair;
}
