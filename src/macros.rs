// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

/// Assert that a type is `Send`. Drivers are handed across thread boundaries
/// by callers embedding this library in their own parallel experiment
/// runners, so this is checked for every public driver type.
#[macro_export]
macro_rules! send_sync_test {
    ($name:ident, $type:ty) => {
        #[allow(non_snake_case)]
        #[test]
        fn $name() {
            fn assert_send<T: Send>() {}
            assert_send::<$type>();
        }
    };
}
