//! BITMAP value decoding.
//!
//! Tuya reports fault and status flags as an integer whose bits are independent
//! flags, described by an ordered label list. `0b101` against `["E01", "E02", "E03"]`
//! decodes to `"E01,E03"`. A value with no active flag decodes to a sentinel:
//! `"00"` when the device declares that label, `"0"` otherwise.

use log::debug;
use serde_json::Value;

/// Explicit "no fault" label declared by many devices.
pub const NO_FAULT: &str = "00";
/// Fallback sentinel when the label table has no explicit "no fault" label.
pub const ZERO: &str = "0";

const SEPARATOR: &str = ",";

/// Labels that stand for "no active flag" and are never reported as active.
pub fn is_sentinel(label: &str) -> bool {
    label == NO_FAULT || label == ZERO
}

/// The sentinel to report for a table when no flag is active.
pub fn sentinel<S: AsRef<str>>(labels: &[S]) -> &'static str {
    if labels.iter().any(|l| l.as_ref() == NO_FAULT) {
        NO_FAULT
    } else {
        ZERO
    }
}

/// Name used for a set bit the label table does not cover (0-indexed).
pub fn bit_label(bit: u32) -> String {
    format!("bit{}", bit)
}

/// Decodes `value` against `labels`, lowest bit first.
pub fn decode<S: AsRef<str>>(value: u64, labels: &[S]) -> String {
    let mut active: Vec<String> = Vec::new();
    let mut remaining = value;
    let mut bit = 0u32;

    while remaining != 0 {
        if remaining & 1 == 1 {
            match labels.get(bit as usize) {
                Some(label) if is_sentinel(label.as_ref()) => {}
                Some(label) => active.push(label.as_ref().to_string()),
                None => active.push(bit_label(bit)),
            }
        }
        remaining >>= 1;
        bit += 1;
    }

    if active.is_empty() {
        return sentinel(labels).to_string();
    }
    active.join(SEPARATOR)
}

/// Interprets a raw status value as a bitmask.
///
/// Accepts non-negative JSON integers, integral floats, and strings holding a
/// decimal integer (some firmwares report bitmaps as text). Anything else is `None`.
///
/// Masks are limited to 64 bits: values of 2^64 or more are rejected, in either
/// form, instead of being clamped. Tuya bitmaps use at most 32.
pub fn parse_raw_value(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Decodes a raw status value. Values that are not a usable bitmask report `None`
/// (unavailable) rather than being coerced to zero.
pub fn decode_value<S: AsRef<str>>(raw: &Value, labels: &[S]) -> Option<String> {
    match parse_raw_value(raw) {
        Some(value) => Some(decode(value, labels)),
        None => {
            debug!("Ignoring non-integer bitmap value: {}", raw);
            None
        }
    }
}
