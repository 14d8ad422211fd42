//! Bus naming conventions.
//!
//! Buses use angle-bracket suffixes: a single bit of `noconn` is `noconn<3>`,
//! and the range of bits 3 down to 0 is `noconn<3:0>`.

use arcstr::ArcStr;

/// Names a single bit of a bus.
pub fn bus_bit(name: &str, index: usize) -> ArcStr {
    arcstr::format!("{name}<{index}>")
}

/// Names the range `hi` down to `lo` of a bus.
pub fn bus_range(name: &str, hi: usize, lo: usize) -> ArcStr {
    arcstr::format!("{name}{}", range_suffix(hi, lo))
}

/// The `<hi:lo>` suffix of a bus range.
pub fn range_suffix(hi: usize, lo: usize) -> String {
    format!("<{hi}:{lo}>")
}

/// Splits a name into its base and the width implied by its bus suffix.
///
/// Names without a suffix are scalars of width 1, as are single-bit
/// names such as `x<4>`.
pub fn split_bus(name: &str) -> (&str, usize) {
    let Some(body) = name.strip_suffix('>') else {
        return (name, 1);
    };
    let Some(open) = body.rfind('<') else {
        return (name, 1);
    };
    let (base, range) = (&body[..open], &body[open + 1..]);
    match range.split_once(':') {
        Some((hi, lo)) => match (hi.parse::<usize>(), lo.parse::<usize>()) {
            (Ok(hi), Ok(lo)) => match hi.abs_diff(lo).checked_add(1) {
                Some(width) => (base, width),
                None => (name, 1),
            },
            _ => (name, 1),
        },
        None => match range.parse::<usize>() {
            Ok(_) => (base, 1),
            Err(_) => (name, 1),
        },
    }
}
