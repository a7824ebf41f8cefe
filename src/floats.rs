// Floating point producers.

use crate::distributions::Sampler;
use crate::ints::{CENTRAL_MAX, CENTRAL_MIN};
use crate::producer::Producer;
use crate::seed::Seed;
use crate::shrinking;

const FLOAT_BRANCHES: [f64; 2] = [3.0, 0.5];

/// Uniform, exact zero, exact one.
const PERCENTAGE_BRANCHES: [f64; 3] = [8.0, 1.0, 1.0];

const EXPONENT_LIMIT: u64 = 0x7FF;
const MANTISSA_MASK: u64 = (1 << 52) - 1;

/// Any finite f64: random sign and mantissa, exponent short of the all-ones
/// pattern reserved for infinities and NaN.
fn any_finite(seed: &mut Seed) -> f64 {
    let sign = seed.next_u64() & (1 << 63);
    let exponent = crate::distributions::bounded_int(seed, EXPONENT_LIMIT - 1);
    let mantissa = seed.next_u64() & MANTISSA_MASK;
    f64::from_bits(sign | exponent << 52 | mantissa)
}

/// Finite floats, mostly from `[-50, 50]`.
pub fn float() -> Producer<f64> {
    let branches = Sampler::new(&FLOAT_BRANCHES);
    Producer::new(
        move |seed: &mut Seed| {
            Ok(match branches.sample(seed) {
                0 => seed.float_in_range(CENTRAL_MIN as f64, CENTRAL_MAX as f64),
                _ => any_finite(seed),
            })
        },
        shrinking::float,
    )
}

/// Floats in `[0, 1]` with extra weight on the boundaries.
pub fn percentage() -> Producer<f64> {
    let branches = Sampler::new(&PERCENTAGE_BRANCHES);
    Producer::new(
        move |seed: &mut Seed| {
            Ok(match branches.sample(seed) {
                0 => seed.float_in_range(0.0, 1.0),
                1 => 0.0,
                _ => 1.0,
            })
        },
        |value: &f64| shrinking::float(value).filter(|x| (0.0..=1.0).contains(x)),
    )
}
