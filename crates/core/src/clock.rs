// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current wall-clock time in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock time in the zone recording filenames are written in.
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Clock;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// Fake clock for testing with controllable time.
    ///
    /// `local_now` is the naive UTC time so tests do not depend on the host zone.
    #[derive(Clone)]
    pub struct FakeClock {
        current: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self::at(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default())
        }

        /// Create a clock fixed at the given instant
        pub fn at(instant: DateTime<Utc>) -> Self {
            Self { current: Arc::new(Mutex::new(instant)) }
        }

        /// Advance the clock by the given duration
        pub fn advance(&self, duration: Duration) {
            let delta = chrono::Duration::from_std(duration).unwrap_or_default();
            *self.current.lock() += delta;
        }

        /// Set the clock to a specific instant
        pub fn set(&self, instant: DateTime<Utc>) {
            *self.current.lock() = instant;
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.current.lock()
        }

        fn local_now(&self) -> NaiveDateTime {
            self.now().naive_utc()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
