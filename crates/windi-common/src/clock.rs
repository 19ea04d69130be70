// [crates/windi-common/src/clock.rs]
//! Epoch-millisecond clock. Centralized so every header's `ts` field and
//! every replay-drift calculation reads from the same source.

use chrono::Utc;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
