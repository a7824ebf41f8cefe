// Character and string producers.
// Each char family samples uniformly from its own range and shrinks toward
// the simplest member of that range, so shrunk values never leave the family.

use crate::collections::MAX_COLLECTION_LENGTH;
use crate::distributions::Sampler;
use crate::producer::Producer;
use crate::seed::Seed;
use crate::shrinking::{self, ShrinkFn};

use std::sync::Arc;

/// Non-empty short strings, the empty string, longer strings.
const STRING_BRANCHES: [f64; 3] = [3.0, 0.2, 1.0];
const LONG_STRING_MAX: i64 = 50;

fn char_family(min: char, max: char, floor: char) -> Producer<char> {
    Producer::new(
        move |seed: &mut Seed| Ok(seed.char_in_range(min, max)),
        move |value: &char| shrinking::char_toward(floor, *value),
    )
}

/// Printable ASCII, `' '` through `'~'`.
pub fn char() -> Producer<char> {
    char_family(' ', '~', ' ')
}

pub fn upper_case_char() -> Producer<char> {
    char_family('A', 'Z', 'A')
}

pub fn lower_case_char() -> Producer<char> {
    char_family('a', 'z', 'a')
}

/// The full ASCII range including control characters. Control characters do
/// not shrink; everything else shrinks toward `' '`.
pub fn ascii() -> Producer<char> {
    char_family('\0', '\x7f', ' ')
}

/// Any Unicode scalar value.
pub fn unicode() -> Producer<char> {
    Producer::new(
        |seed: &mut Seed| Ok(seed.any_char()),
        |value: &char| shrinking::char_toward(' ', *value),
    )
}

/// Strings of printable ASCII.
///
/// Shrinking removes runs of characters first (the empty string is always
/// the first candidate), then simplifies one character at a time.
pub fn string() -> Producer<String> {
    let branches = Sampler::new(&STRING_BRANCHES);
    let chars = char();
    let char_shrinker: ShrinkFn<char> = chars.shrinker();
    Producer::new(
        move |seed: &mut Seed| {
            let length = match branches.sample(seed) {
                0 => seed.int_in_range(1, MAX_COLLECTION_LENGTH as i64),
                1 => 0,
                _ => seed.int_in_range(MAX_COLLECTION_LENGTH as i64 + 1, LONG_STRING_MAX),
            };
            let mut value = String::with_capacity(length as usize);
            for _ in 0..length {
                value.push(chars.draw(seed)?);
            }
            Ok(value)
        },
        move |value: &String| {
            let letters: Vec<char> = value.chars().collect();
            shrinking::vec(&letters, Arc::clone(&char_shrinker)).map(|letters| letters.into_iter().collect::<String>())
        },
    )
}
