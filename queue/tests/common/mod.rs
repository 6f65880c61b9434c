#![allow(dead_code)]

use std::time::Duration;

/// How long a thread is given to reach a blocking call before asserting it is parked.
pub const SETTLE: Duration = Duration::from_millis(100);
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(500);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(3);
pub const STRESS_TIMEOUT: Duration = Duration::from_secs(15);
pub const ITEMS_LOW: usize = 50;
pub const ITEMS_MEDIUM: usize = 200;
pub const ITEMS_HIGH: usize = 1000;
