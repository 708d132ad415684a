//! Shared key construction for storage backends.
//!
//! Key format: `generations/{userId|anon}/{epochMillis}.png`.

use std::sync::atomic::{AtomicI64, Ordering};

use easel_core::models::ANONYMOUS_SEGMENT;

pub const GENERATIONS_PREFIX: &str = "generations";

/// Extension and content type of every stored object.
pub const IMAGE_EXTENSION: &str = "png";
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Build the storage key for a generated image.
///
/// `user_segment` must already be validated as a single path segment; `None`
/// stores the object under `anon`.
pub fn generation_key(user_segment: Option<&str>, millis: i64) -> String {
    format!(
        "{}/{}/{}.{}",
        GENERATIONS_PREFIX,
        user_segment.unwrap_or(ANONYMOUS_SEGMENT),
        millis,
        IMAGE_EXTENSION
    )
}

/// Millisecond clock that never hands out the same value twice.
///
/// Each call returns `max(now, previous + 1)`, so sequential uploads from one
/// process always get distinct, increasing key timestamps.
#[derive(Debug, Default)]
pub struct KeyClock {
    last: AtomicI64,
}

impl KeyClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_millis(&self) -> i64 {
        self.next_after(chrono::Utc::now().timestamp_millis())
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}
