//! Input clamping for selection size and error bound.
//!
//! Out-of-range requests are recovered locally rather than rejected: the
//! analysis always answers *some* in-range question, and reports what it
//! actually answered.

use serde::{Deserialize, Serialize};

/// A clamped value together with whether clamping changed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clamped<T> {
    pub value: T,
    pub adjusted: bool,
}

/// Clamp a requested selection size to `[1, n - 1]`.
///
/// Non-integer input is floored first. Non-finite input falls back to 1.
/// Requires `n >= 2`.
pub fn clamp_k(requested: f64, n: usize) -> Clamped<usize> {
    assert!(n >= 2, "clamp_k needs at least two items, got {n}");
    let hi = n - 1;
    let floored = requested.floor();
    if !floored.is_finite() {
        return Clamped {
            value: 1,
            adjusted: true,
        };
    }
    let value = if floored < 1.0 {
        1
    } else if floored > hi as f64 {
        hi
    } else {
        floored as usize
    };
    Clamped {
        value,
        adjusted: value as f64 != requested,
    }
}

/// Clamp a requested error bound to `>= 0`. Non-finite input becomes 0.
pub fn clamp_epsilon(requested: f64) -> Clamped<f64> {
    if !requested.is_finite() {
        return Clamped {
            value: 0.0,
            adjusted: true,
        };
    }
    if requested < 0.0 {
        return Clamped {
            value: 0.0,
            adjusted: true,
        };
    }
    Clamped {
        value: requested,
        adjusted: false,
    }
}
