//! Shrink primitives for scalar values and sequences.
//!
//! Every function here returns a lazy, finite sequence of candidates that are
//! strictly simpler than the input and never equal to it. Repeatedly shrinking
//! any candidate converges: integers and floats move strictly closer to their
//! origin, chars move toward a floor code point, and sequences either lose
//! elements or shrink one element while keeping their length.

use std::iter;
use std::rc::Rc;
use std::sync::Arc;

/// A lazily computed sequence of shrink candidates.
pub type Candidates<T> = Box<dyn Iterator<Item = T>>;

/// A shareable shrinker.
pub type ShrinkFn<T> = Arc<dyn Fn(&T) -> Candidates<T> + Send + Sync>;

/// Below this gap the float series stops halving.
const FLOAT_RESOLUTION: f64 = 1e-4;

pub fn none<T: 'static>() -> Candidates<T> {
    Box::new(iter::empty())
}

/// Offsets `0, n/2, 3n/4, ...` strictly below `n`, each closer to `n` than
/// the last.
fn halving_series(n: u128) -> impl Iterator<Item = u128> {
    iter::successors(if n == 0 { None } else { Some(0u128) }, move |&low| {
        let next = low + (n - low) / 2;
        if next > low {
            Some(next)
        } else {
            None
        }
    })
}

/// Candidates between `target` (inclusive) and `value` (exclusive).
pub fn int_toward(target: i64, value: i64) -> Candidates<i64> {
    let distance = (value as i128 - target as i128).unsigned_abs();
    let direction: i128 = if value > target { 1 } else { -1 };
    Box::new(
        halving_series(distance).map(move |offset| (target as i128 + direction * offset as i128) as i64),
    )
}

/// Integers shrink toward zero. A negative value offers its positive mirror
/// first.
pub fn int(value: &i64) -> Candidates<i64> {
    let value = *value;
    if value < 0 {
        let mirror = value.checked_neg();
        Box::new(mirror.into_iter().chain(int_toward(0, value)))
    } else {
        int_toward(0, value)
    }
}

fn float_series(high: f64) -> impl Iterator<Item = f64> {
    let truncated = high.trunc();
    let integral = if truncated != high && truncated != 0.0 {
        Some(truncated)
    } else {
        None
    };
    let halves = iter::successors(Some(0.0f64), move |&low| {
        let next = low + (high - low) / 2.0;
        if next > low && high - next >= FLOAT_RESOLUTION {
            Some(next)
        } else {
            None
        }
    })
    .skip(1);
    iter::once(0.0).chain(integral).chain(halves.filter(move |x| Some(*x) != integral))
}

/// Floats shrink toward zero; non-finite values shrink straight to zero.
pub fn float(value: &f64) -> Candidates<f64> {
    let value = *value;
    if value == 0.0 {
        none()
    } else if !value.is_finite() {
        Box::new(iter::once(0.0))
    } else if value < 0.0 {
        Box::new(
            iter::once(-value).chain(float_series(-value).map(|x| if x == 0.0 { 0.0 } else { -x })),
        )
    } else {
        Box::new(float_series(value))
    }
}

pub fn bool(value: &bool) -> Candidates<bool> {
    if *value {
        Box::new(iter::once(false))
    } else {
        none()
    }
}

pub fn order(value: &std::cmp::Ordering) -> Candidates<std::cmp::Ordering> {
    use std::cmp::Ordering::*;
    match value {
        Greater => Box::new(vec![Equal, Less].into_iter()),
        Less => Box::new(iter::once(Equal)),
        Equal => none(),
    }
}

/// Chars shrink toward `floor`; a char at or below `floor` has no candidates.
pub fn char_toward(floor: char, value: char) -> Candidates<char> {
    if value <= floor {
        return none();
    }
    Box::new(int_toward(floor as i64, value as i64).filter_map(|code| char::from_u32(code as u32)))
}

fn chunk_sizes(n: usize) -> impl Iterator<Item = usize> {
    iter::successors(Some(n), |k| Some(k / 2)).take_while(|k| *k > 0)
}

/// Shrinks a sequence in two passes. First, for chunk sizes `n, n/2, ..., 1`,
/// each aligned chunk is removed in turn, so the empty sequence comes first.
/// Then each position is replaced by each of its own candidates, the other
/// positions held fixed.
pub fn vec<T: Clone + 'static>(items: &[T], element: ShrinkFn<T>) -> Candidates<Vec<T>> {
    let items: Rc<Vec<T>> = Rc::new(items.to_vec());
    let n = items.len();

    let removals = {
        let items = Rc::clone(&items);
        chunk_sizes(n).flat_map(move |k| {
            let items = Rc::clone(&items);
            (0..n).step_by(k).map(move |start| {
                let end = (start + k).min(n);
                let mut shrunk = Vec::with_capacity(n - (end - start));
                shrunk.extend_from_slice(&items[..start]);
                shrunk.extend_from_slice(&items[end..]);
                shrunk
            })
        })
    };

    let replacements = (0..n).flat_map(move |i| {
        let items = Rc::clone(&items);
        let candidates = element(&items[i]);
        candidates.map(move |candidate| {
            let mut shrunk = items.as_ref().clone();
            shrunk[i] = candidate;
            shrunk
        })
    });

    Box::new(removals.chain(replacements))
}
