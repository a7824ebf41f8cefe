//! Producers for optional values, results and variable-length sequences.

use crate::distributions::weighted;
use crate::producer::{Draw, Producer};
use crate::seed::Seed;
use crate::shrinking;

use std::collections::VecDeque;
use std::iter;

/// Longest collection `list` and `array` generate.
pub const MAX_COLLECTION_LENGTH: usize = 10;

/// Chance of the populated arm of `maybe`, and of `Ok` in `result`.
const PRESENT_PROBABILITY: f64 = 0.75;

/// `None` a quarter of the time, otherwise `Some` of a sample.
///
/// `Some(x)` shrinks to `None` first, then to `Some(c)` for each candidate
/// `c` of `x`.
pub fn maybe<T: 'static>(producer: Producer<T>) -> Producer<Option<T>> {
    let shrinker = producer.shrinker();
    Producer::new(
        move |seed: &mut Seed| {
            if weighted(seed, PRESENT_PROBABILITY) {
                producer.draw(seed).map(Some)
            } else {
                Ok(None)
            }
        },
        move |value: &Option<T>| -> shrinking::Candidates<Option<T>> {
            match value {
                Some(inner) => Box::new(iter::once(None).chain(shrinker(inner).map(Some))),
                None => shrinking::none(),
            }
        },
    )
}

/// `Err` a quarter of the time, otherwise `Ok`.
///
/// Each arm shrinks within its own producer. Neither arm counts as simpler
/// than the other, so no candidate switches arms.
pub fn result<E: 'static, V: 'static>(errors: Producer<E>, values: Producer<V>) -> Producer<Result<V, E>> {
    let shrink_error = errors.shrinker();
    let shrink_value = values.shrinker();
    Producer::new(
        move |seed: &mut Seed| {
            if weighted(seed, PRESENT_PROBABILITY) {
                values.draw(seed).map(Ok)
            } else {
                errors.draw(seed).map(Err)
            }
        },
        move |value: &Result<V, E>| -> shrinking::Candidates<Result<V, E>> {
            match value {
                Ok(v) => Box::new(shrink_value(v).map(Ok)),
                Err(e) => Box::new(shrink_error(e).map(Err)),
            }
        },
    )
}

fn draw_elements<T: 'static>(element: &Producer<T>, seed: &mut Seed) -> Draw<Vec<T>> {
    let length = seed.int_in_range(0, MAX_COLLECTION_LENGTH as i64) as usize;
    let mut items = Vec::with_capacity(length);
    for _ in 0..length {
        items.push(element.draw(seed)?);
    }
    Ok(items)
}

/// Vectors of up to ten independent samples, length uniform in `[0, 10]`.
///
/// Shrinking drops chunks of elements first, largest chunks first, so the
/// empty vector is the first candidate of any non-empty one. After that each
/// element is shrunk in place with the rest held fixed.
pub fn list<T: Clone + 'static>(element: Producer<T>) -> Producer<Vec<T>> {
    let shrinker = element.shrinker();
    Producer::new(
        move |seed: &mut Seed| draw_elements(&element, seed),
        move |items: &Vec<T>| shrinking::vec(items, shrinker.clone()),
    )
}

/// As [`list`], collected into a `VecDeque`.
pub fn array<T: Clone + 'static>(element: Producer<T>) -> Producer<VecDeque<T>> {
    let shrinker = element.shrinker();
    Producer::new(
        move |seed: &mut Seed| draw_elements(&element, seed).map(VecDeque::from),
        move |items: &VecDeque<T>| {
            let items: Vec<T> = items.iter().cloned().collect();
            shrinking::vec(&items, shrinker.clone()).map(VecDeque::from)
        },
    )
}
