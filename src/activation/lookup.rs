//! Shared lookup table for the cached sigmoid.
//!
//! The table is built once, on first use or on an explicit
//! [`init_sigmoid_lookup`] call, and is immutable afterwards, so every
//! network and every thread reads the same values.

use once_cell::sync::Lazy;

use super::activation::sigmoid;

pub const LOOKUP_SIZE: usize = 4096;
pub const DOMAIN_MIN: f64 = -15.0;
pub const DOMAIN_MAX: f64 = 15.0;

/// Table entries per unit of input.
const INTERVAL: f64 = LOOKUP_SIZE as f64 / (DOMAIN_MAX - DOMAIN_MIN);

static SIGMOID_TABLE: Lazy<Vec<f64>> = Lazy::new(|| {
    let step = (DOMAIN_MAX - DOMAIN_MIN) / LOOKUP_SIZE as f64;
    (0..LOOKUP_SIZE)
        .map(|i| sigmoid(DOMAIN_MIN + step * i as f64))
        .collect()
});

/// Builds the cached-sigmoid table if it does not exist yet.
/// Calling it again is a no-op.
pub fn init_sigmoid_lookup() {
    Lazy::force(&SIGMOID_TABLE);
}

/// Nearest-entry lookup, clamped to the table ends outside the domain.
pub fn sigmoid_cached(x: f64) -> f64 {
    let table = &*SIGMOID_TABLE;
    if x.is_nan() {
        return f64::NAN;
    }
    if x < DOMAIN_MIN {
        return table[0];
    }
    if x >= DOMAIN_MAX {
        return table[LOOKUP_SIZE - 1];
    }
    let j = ((x - DOMAIN_MIN) * INTERVAL + 0.5) as usize;
    table[j.min(LOOKUP_SIZE - 1)]
}
