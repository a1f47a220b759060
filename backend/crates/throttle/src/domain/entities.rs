//! Domain Entities

/// One fixed window's counter for one rate key
///
/// The window is anchored at the first request: `reset_at_ms` is set
/// once when the window opens and never slides. A counter whose
/// deadline has passed is stale and is replaced by a fresh window on
/// the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCounter {
    pub count: u32,
    pub reset_at_ms: i64,
}

impl WindowCounter {
    /// Open a fresh window with its first request already counted
    pub fn open(now_ms: i64, window_ms: i64) -> Self {
        Self {
            count: 1,
            reset_at_ms: now_ms + window_ms,
        }
    }

    /// Whether the window deadline has passed
    pub fn is_stale(&self, now_ms: i64) -> bool {
        now_ms >= self.reset_at_ms
    }
}
