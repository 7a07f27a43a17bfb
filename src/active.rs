//! Active job id, derived from the external hash-like signal.
//!
//! The signal's lifecycle belongs to the embedding layer; this module only
//! parses fragment strings and caches the last result.

use parking_lot::Mutex;

/// Parse a URL fragment into a job id. A leading `#` is accepted.
/// Malformed input yields `None` — never an error.
pub fn parse_fragment(fragment: &str) -> Option<u64> {
    let digits = fragment.trim().trim_start_matches('#');
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Caches the id last parsed from the fragment signal.
#[derive(Debug, Default)]
pub struct ActiveIdSelector {
    current: Mutex<Option<u64>>,
}

impl ActiveIdSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute from a fragment change. Returns the new active id.
    pub fn update(&self, fragment: &str) -> Option<u64> {
        let id = parse_fragment(fragment);
        *self.current.lock() = id;
        id
    }

    pub fn current(&self) -> Option<u64> {
        *self.current.lock()
    }
}
