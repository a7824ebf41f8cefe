// Producers for unit, booleans and orderings.

use crate::producer::Producer;
use crate::seed::Seed;
use crate::shrinking;

use std::cmp::Ordering;

pub fn void() -> Producer<()> {
    Producer::constant(())
}

pub fn bool() -> Producer<bool> {
    Producer::new(|seed: &mut Seed| Ok(seed.next_u64() & 1 == 1), shrinking::bool)
}

pub fn order() -> Producer<Ordering> {
    const ORDERINGS: [Ordering; 3] = [Ordering::Less, Ordering::Equal, Ordering::Greater];
    Producer::new(
        |seed: &mut Seed| Ok(ORDERINGS[seed.int_in_range(0, 2) as usize]),
        shrinking::order,
    )
}
