//! Basic example demonstrating per-call-site rate limiting.
//!
//! Warnings are limited to 3 per call site per second: the 4th message of a
//! burst carries the suppression prefix and the rest are dropped until the
//! next one-second window.

use ratelog::{errorf, infof, warnf, LoggerConfig};
use std::ops::RangeInclusive;
use std::time::Duration;

fn cache_misses(range: RangeInclusive<u32>) {
    for i in range {
        warnf!("cache miss #{}", i);
    }
}

fn main() {
    ratelog::must_init(LoggerConfig {
        warns_per_second_limit: 3,
        errors_per_second_limit: 1,
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        ..LoggerConfig::default()
    });

    infof!("=== Basic Rate Limiting Example ===");
    infof!("policy: 3 warnings per call site per second");

    // 10 warnings from one call site: 3 plain, 1 announced, 6 dropped
    cache_misses(1..=10);

    // Different call site, independent budget
    for i in 1..=3 {
        errorf!("upstream timeout #{}", i);
    }

    infof!("waiting for the next window");
    std::thread::sleep(Duration::from_millis(1100));

    // Same call site, fresh budget
    cache_misses(11..=12);

    infof!("done");
}
