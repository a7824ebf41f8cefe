// Tuple producers.
// Components are sampled independently. A tuple shrinks one position at a
// time: first every candidate of the first component with the rest held
// fixed, then the second, and so on. Positions are never shrunk together, so
// the number of candidates is the sum of the components' counts rather than
// their product.

use crate::producer::Producer;
use crate::seed::Seed;
use crate::shrinking::Candidates;

use std::iter;

macro_rules! tuple_producer {
    ($(#[$meta:meta])* $name:ident => $(($index:tt, $ty:ident, $producer:ident)),+) => {
        $(#[$meta])*
        pub fn $name<$($ty),+>($($producer: Producer<$ty>),+) -> Producer<($($ty,)+)>
        where
            $($ty: Clone + 'static),+
        {
            let shrinkers = ($($producer.shrinker(),)+);
            Producer::new(
                move |seed: &mut Seed| Ok(($($producer.draw(seed)?,)+)),
                move |value: &($($ty,)+)| {
                    let mut candidates: Candidates<($($ty,)+)> = Box::new(iter::empty());
                    $(
                        let held = value.clone();
                        let shrunk = (shrinkers.$index)(&value.$index).map(move |candidate| {
                            let mut next = held.clone();
                            next.$index = candidate;
                            next
                        });
                        candidates = Box::new(candidates.chain(shrunk));
                    )+
                    candidates
                },
            )
        }
    };
}

tuple_producer!(
    /// Pairs of independent samples.
    tuple2 => (0, A, first), (1, B, second)
);

tuple_producer!(tuple3 => (0, A, first), (1, B, second), (2, C, third));

tuple_producer!(tuple4 => (0, A, first), (1, B, second), (2, C, third), (3, D, fourth));

tuple_producer!(
    tuple5 => (0, A, first), (1, B, second), (2, C, third), (3, D, fourth), (4, E, fifth)
);
