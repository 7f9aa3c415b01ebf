//! Construction-time conversion policy.
//!
//! Replaces the "global mutable strict/safe toggle" pattern (see DESIGN.md) with a
//! small value object threaded explicitly through the temporal and point codecs.
//! Converters stay side-effect-free; the policy only decides what happens on
//! out-of-range input, never how the happy path behaves.

/// How the point and temporal codecs handle out-of-range or unparseable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Reject out-of-range coordinates and unparseable timestamps with an error.
    #[default]
    Strict,
    /// Clamp coordinates to the nearest valid value and non-finite numbers to
    /// `0.0`; fall back to a sentinel zero instant on unparseable timestamps.
    /// Both cases emit a `log::warn!` diagnostic rather than silently dropping data.
    Safe,
}

/// Policy bundle passed into conversions. Built once by the caller, shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionPolicy {
    /// Strict vs. safe handling of coordinates and timestamps.
    pub coordinates: CoordinatePolicy,
}

impl ConversionPolicy {
    /// Strict policy: out-of-range data is an error.
    pub fn strict() -> Self {
        Self {
            coordinates: CoordinatePolicy::Strict,
        }
    }

    /// Safe policy: out-of-range data is clamped/replaced with a diagnostic.
    pub fn safe() -> Self {
        Self {
            coordinates: CoordinatePolicy::Safe,
        }
    }

    /// Whether this policy clamps rather than rejects.
    pub fn is_safe(&self) -> bool {
        self.coordinates == CoordinatePolicy::Safe
    }
}
