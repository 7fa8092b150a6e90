//! Single-slot cache of the most recent valid sample.

use parking_lot::RwLock;

use super::sample::Sample;

/// Holds the latest focus sample for polling clients.
///
/// Empty until the first valid sample arrives. Replacement is atomic: a
/// reader sees either the previous sample or the new one, never a partial
/// write.
pub struct LatestFocus {
    slot: RwLock<Option<Sample>>,
}

impl LatestFocus {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Replace the stored sample.
    pub fn set(&self, sample: Sample) {
        *self.slot.write() = Some(sample);
    }

    /// Read the current sample, or `None` if nothing has been ingested yet.
    pub fn get(&self) -> Option<Sample> {
        *self.slot.read()
    }
}

impl Default for LatestFocus {
    fn default() -> Self {
        Self::new()
    }
}
