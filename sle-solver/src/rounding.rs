//! Cosmetic rounding of solution vectors
//!
//! This is a display heuristic, not a precision guarantee. Each non-integer
//! component is scanned digit by digit after the decimal point (in its
//! shortest round-trip decimal form). Rounding happens at the current digit
//! count as soon as either `max_decimals` digits have been read or the
//! current digit starts a run of `min_run` identical digits. A value such
//! as `0.33333333` therefore becomes `0.3`, and `1.9999999998` becomes `2`.
//! The result depends on the scan order and can coarsen legitimate values.

use sle_core::{RoundingPolicy, NOISE_TOLERANCE};
use crate::types::Vector;

/// Apply the rounding heuristic to every component in place
pub fn round_repeating_decimals(values: &mut Vector, policy: RoundingPolicy) {
    for value in values.iter_mut() {
        *value = round_value(*value, policy.min_run, policy.max_decimals);
    }
}

/// Apply the rounding heuristic to a single value
pub fn round_value(value: f64, min_run: usize, max_decimals: usize) -> f64 {
    if !value.is_finite() || value.fract() == 0.0 {
        return value;
    }
    if value.abs() <= NOISE_TOLERANCE {
        return 0.0;
    }

    let text = value.to_string();
    let Some(point) = text.find('.') else {
        return value;
    };
    let decimals = &text.as_bytes()[point + 1..];

    for (j, &digit) in decimals.iter().enumerate() {
        let digits = j + 1;
        let run = decimals[j..]
            .iter()
            .take(min_run)
            .take_while(|&&d| d == digit)
            .count();

        if digits >= max_decimals || run == min_run {
            let scale = 10f64.powi(digits as i32);
            return round_half_up(value * scale) / scale;
        }
    }

    value
}

/// Nearest integer, ties toward positive infinity
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
