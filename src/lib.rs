//! # Conjecture Producer
//!
//! Composable value producers for property-based testing. A [`Producer`]
//! pairs a seeded generator with a shrinker, and the combinators in this crate
//! build larger producers (options, results, lists, tuples, converted and
//! filtered values, generated functions) out of smaller ones while keeping the
//! two halves consistent.
//!
//! The [`engine`] module runs properties against a producer and minimizes the
//! first counterexample it finds.

pub mod basics;
pub mod collections;
pub mod distributions;
pub mod engine;
pub mod floats;
pub mod functions;
pub mod ints;
pub mod producer;
pub mod seed;
pub mod shrinking;
pub mod strings;
pub mod tuples;

pub use engine::{check, check_that, CheckConfig, CheckError, Evidence, Failure, Outcome};
pub use functions::Function;
pub use producer::{Draw, ProduceError, Producer, DEFAULT_FILTER_ATTEMPTS};
pub use seed::Seed;
pub use shrinking::Candidates;

/// Older name for [`Producer`], kept for code written against it.
pub type Investigator<T> = Producer<T>;
