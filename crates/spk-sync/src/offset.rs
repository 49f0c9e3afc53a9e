//! Offset source: the monotonic version marker behind every broadcast.
//!
//! # Invariants
//!
//! - **Strictly increasing**: every call to [`OffsetSource::next`] returns an
//!   offset greater than the previous one, even when two publishes land in
//!   the same millisecond or the wall clock steps backwards.
//! - **Time-correlated**: with a healthy clock the offset equals the publish
//!   time in epoch milliseconds, so logs and offsets line up.
//! - **Pure**: the caller supplies `now_ms`; nothing here reads a clock.

use spk_schemas::StateOffset;

/// Produces the strictly increasing offsets stamped onto parking broadcasts.
///
/// Wall-clock milliseconds are the base source, nudged forward past the last
/// issued offset whenever the clock has not advanced.
#[derive(Clone, Debug)]
pub struct OffsetSource {
    last: i64,
}

impl Default for OffsetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetSource {
    /// A fresh source. The first issued offset is at least 1, so it can never
    /// collide with [`StateOffset::ZERO`] reported by never-synced clients.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Issue the next offset for a publish happening at `now_ms`.
    pub fn next(&mut self, now_ms: i64) -> StateOffset {
        self.last = now_ms.max(self.last + 1);
        StateOffset(self.last)
    }

    /// The most recently issued offset, [`StateOffset::ZERO`] before the
    /// first publish.
    pub fn current(&self) -> StateOffset {
        StateOffset(self.last)
    }
}
