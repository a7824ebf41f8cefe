// Integer producers.
// `int` samples mostly from a small central range so failures stay readable,
// with an occasional draw from the whole of i64 to reach the extremes.

use crate::distributions::Sampler;
use crate::producer::Producer;
use crate::seed::Seed;
use crate::shrinking;

/// Bounds of the range `int` and `float` favour.
pub const CENTRAL_MIN: i64 = -50;
pub const CENTRAL_MAX: i64 = 50;

/// Relative weights of the central and full-range branches of `int`.
const INT_BRANCHES: [f64; 2] = [3.0, 0.2];

pub fn int() -> Producer<i64> {
    let branches = Sampler::new(&INT_BRANCHES);
    Producer::new(
        move |seed: &mut Seed| {
            Ok(match branches.sample(seed) {
                0 => seed.int_in_range(CENTRAL_MIN, CENTRAL_MAX),
                _ => seed.int_in_range(i64::MIN, i64::MAX),
            })
        },
        shrinking::int,
    )
}

/// Integers uniformly distributed in `[min, max]`.
///
/// Values shrink toward the member of the range closest to zero and never
/// leave the range.
///
/// # Panics
///
/// If `min > max`.
pub fn range_int(min: i64, max: i64) -> Producer<i64> {
    assert!(min <= max, "range_int: min ({}) > max ({})", min, max);
    let origin = 0i64.clamp(min, max);
    Producer::new(
        move |seed: &mut Seed| Ok(seed.int_in_range(min, max)),
        move |value: &i64| shrinking::int_toward(origin, *value),
    )
}
