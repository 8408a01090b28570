use js_sys::Date;

use crate::types::Timestamp;

/// Monotonic source for receipt timestamps. `std::time::Instant` is not
/// available in the browser, so this reads the JS wall clock instead.
pub struct Clock {
    start_millis: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start_millis: Date::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> Timestamp {
        ((Date::now() - self.start_millis) / 1000.0).max(0.0)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
