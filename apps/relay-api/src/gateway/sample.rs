//! The focus sample value type and its wire decoding.

use serde::{Deserialize, Serialize};

/// One scored focus observation from a producer.
///
/// `score` is clamped to `[0.0, 1.0]` at construction; `ts` is seconds since
/// epoch as reported by the producer (fractional wall clock).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub score: f64,
    pub ts: f64,
}

impl Sample {
    pub fn new(score: f64, ts: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            ts,
        }
    }

    /// Decode an inbound text frame.
    ///
    /// Unknown fields are ignored. A missing or non-numeric `score` or `ts`
    /// is a decode error; the caller still relays such frames raw, it just
    /// never stores them.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let decoded: Sample = serde_json::from_str(raw)?;
        Ok(Self::new(decoded.score, decoded.ts))
    }
}
