//! # Producer: paired generation and shrinking
//!
//! A [`Producer<T>`] couples a generator, which samples values of `T` from a
//! [`Seed`], with a shrinker, which proposes simpler candidates for a value the
//! generator produced. Every combinator keeps the two halves consistent: the
//! shrinker only ever receives values its generator can emit, and only ever
//! proposes values inside that same domain.
//!
//! Producers are immutable and cheap to clone. Both halves live behind `Arc`,
//! so several derived producers can share one child without copying it, and a
//! producer can be used from several threads as long as each thread owns its
//! own seed.
//!
//! ```rust
//! use conjecture_producer::{ints, Seed};
//!
//! let even = ints::range_int(0, 100).keep_if(|x| x % 2 == 0);
//! let (value, _next) = even.sample(Seed::new(42))?;
//! assert!(value % 2 == 0);
//! assert!(even.shrink(&value).all(|c| c % 2 == 0));
//! # Ok::<(), conjecture_producer::ProduceError>(())
//! ```

use crate::seed::Seed;
use crate::shrinking::{self, Candidates, ShrinkFn};

use log::warn;
use std::fmt;
use std::sync::Arc;

/// Resampling budget of [`Producer::keep_if`] and [`Producer::drop_if`].
pub const DEFAULT_FILTER_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProduceError {
    /// A filter rejected every sample within its attempt budget.
    #[error("filter rejected {attempts} consecutive samples")]
    Unsatisfiable { attempts: u32 },
}

pub type Draw<T> = Result<T, ProduceError>;

type GenerateFn<T> = Arc<dyn Fn(&mut Seed) -> Draw<T> + Send + Sync>;

pub struct Producer<T> {
    generator: GenerateFn<T>,
    shrinker: ShrinkFn<T>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Producer {
            generator: Arc::clone(&self.generator),
            shrinker: Arc::clone(&self.shrinker),
        }
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Producer<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Producer<T> {
    /// Pair a generator with a shrinker.
    ///
    /// The shrinker must accept every value the generator returns and must
    /// never yield the value it was given.
    pub fn new<G, S, I>(generate: G, shrink: S) -> Producer<T>
    where
        G: Fn(&mut Seed) -> Draw<T> + Send + Sync + 'static,
        S: Fn(&T) -> I + Send + Sync + 'static,
        I: Iterator<Item = T> + 'static,
    {
        Producer {
            generator: Arc::new(generate),
            shrinker: Arc::new(move |value: &T| Box::new(shrink(value)) as Candidates<T>),
        }
    }

    pub fn unshrinkable<G>(generate: G) -> Producer<T>
    where
        G: Fn(&mut Seed) -> Draw<T> + Send + Sync + 'static,
    {
        Producer {
            generator: Arc::new(generate),
            shrinker: Arc::new(|_: &T| shrinking::none()),
        }
    }

    pub fn constant(value: T) -> Producer<T>
    where
        T: Clone + Send + Sync,
    {
        Producer::unshrinkable(move |_: &mut Seed| Ok(value.clone()))
    }

    /// Draw one value, advancing `seed` in place.
    pub fn draw(&self, seed: &mut Seed) -> Draw<T> {
        (self.generator)(seed)
    }

    /// Sample one value, returning it with the successor seed.
    pub fn sample(&self, mut seed: Seed) -> Draw<(T, Seed)> {
        let value = self.draw(&mut seed)?;
        Ok((value, seed))
    }

    pub fn shrink(&self, value: &T) -> Candidates<T> {
        (self.shrinker)(value)
    }

    pub(crate) fn shrinker(&self) -> ShrinkFn<T> {
        Arc::clone(&self.shrinker)
    }

    /// Transform every sampled value with `f`.
    ///
    /// The result never shrinks: `f` is not known to be invertible, so there is
    /// no way back into this producer's domain. Use [`Producer::convert`] when
    /// an inverse exists.
    pub fn map<U, F>(&self, f: F) -> Producer<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.clone();
        Producer::unshrinkable(move |seed: &mut Seed| inner.draw(seed).map(&f))
    }

    /// Transform every sampled value with `to`, shrinking through `from`.
    ///
    /// A value `y` shrinks to `to(c)` for every candidate `c` of `from(&y)`.
    ///
    /// `from` must undo `to`: `from(&to(x)) == x` for every `x` this producer
    /// can generate. This cannot be checked here; when it does not hold,
    /// shrinking silently reports incoherent or non-minimal counterexamples.
    /// [`Producer::convert_checked`] asserts the round trip in debug builds.
    pub fn convert<U, F, G>(&self, to: F, from: G) -> Producer<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
        G: Fn(&U) -> T + Send + Sync + 'static,
    {
        let to = Arc::new(to);
        let inner = self.clone();
        let generate = {
            let to = Arc::clone(&to);
            move |seed: &mut Seed| inner.draw(seed).map(|value| to(value))
        };
        Producer {
            generator: Arc::new(generate),
            shrinker: converted_shrinker(self.shrinker(), to, Arc::new(from)),
        }
    }

    /// [`Producer::convert`], asserting `from(&to(x)) == x` on every sampled
    /// value when debug assertions are enabled.
    pub fn convert_checked<U, F, G>(&self, to: F, from: G) -> Producer<U>
    where
        T: Clone + PartialEq + fmt::Debug,
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
        G: Fn(&U) -> T + Send + Sync + 'static,
    {
        let to = Arc::new(to);
        let from = Arc::new(from);
        let inner = self.clone();
        let generate = {
            let to = Arc::clone(&to);
            let from = Arc::clone(&from);
            move |seed: &mut Seed| {
                let value = inner.draw(seed)?;
                if cfg!(debug_assertions) {
                    let converted = to(value.clone());
                    assert_eq!(from(&converted), value, "convert: inverse does not round-trip");
                    Ok(converted)
                } else {
                    Ok(to(value))
                }
            }
        };
        Producer {
            generator: Arc::new(generate),
            shrinker: converted_shrinker(self.shrinker(), to, from),
        }
    }

    /// Only produce values satisfying `predicate`.
    ///
    /// Sampling redraws up to [`DEFAULT_FILTER_ATTEMPTS`] times and then fails
    /// with [`ProduceError::Unsatisfiable`]. Shrink candidates that fail the
    /// predicate are dropped.
    pub fn keep_if<P>(&self, predicate: P) -> Producer<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.keep_if_within(DEFAULT_FILTER_ATTEMPTS, predicate)
    }

    pub fn keep_if_within<P>(&self, max_attempts: u32, predicate: P) -> Producer<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let generate = {
            let inner = self.clone();
            let predicate = Arc::clone(&predicate);
            move |seed: &mut Seed| {
                for _ in 0..max_attempts {
                    let value = inner.draw(seed)?;
                    if predicate(&value) {
                        return Ok(value);
                    }
                }
                warn!(
                    "filter on {} rejected {} consecutive samples",
                    std::any::type_name::<T>(),
                    max_attempts
                );
                Err(ProduceError::Unsatisfiable {
                    attempts: max_attempts,
                })
            }
        };
        let shrink = {
            let inner = self.shrinker();
            move |value: &T| {
                let predicate = Arc::clone(&predicate);
                inner(value).filter(move |candidate| predicate(candidate))
            }
        };
        Producer::new(generate, shrink)
    }

    /// Only produce values for which `predicate` does not hold.
    pub fn drop_if<P>(&self, predicate: P) -> Producer<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.drop_if_within(DEFAULT_FILTER_ATTEMPTS, predicate)
    }

    pub fn drop_if_within<P>(&self, max_attempts: u32, predicate: P) -> Producer<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.keep_if_within(max_attempts, move |value: &T| !predicate(value))
    }
}

fn converted_shrinker<T, U, F, G>(inner: ShrinkFn<T>, to: Arc<F>, from: Arc<G>) -> ShrinkFn<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
    G: Fn(&U) -> T + Send + Sync + 'static,
{
    Arc::new(move |value: &U| {
        let to = Arc::clone(&to);
        Box::new(inner(&from(value)).map(move |candidate| to(candidate))) as Candidates<U>
    })
}
