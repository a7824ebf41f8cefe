//! Evaluation loop
//!
//! Runs a property against values drawn from a producer. The first failing
//! value is minimized greedily: the loop walks the shrink candidates of the
//! current counterexample, moves to the first candidate that still fails, and
//! stops when no candidate fails or a configured bound is hit. The outcome is
//! reported as an [`Evidence`] record.

use crate::producer::{ProduceError, Producer};
use crate::seed::Seed;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::Cell;
use std::fmt::Debug;
use std::panic::{self, catch_unwind, AssertUnwindSafe};
use std::sync::Once;

/// Configuration for a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Number of values to try before declaring the property to hold
    pub checks: u32,

    /// Seed of the first trial; a run is fully reproducible from it
    pub seed: u64,

    /// Maximum number of successful shrink steps
    pub max_shrink_steps: u32,

    /// Maximum number of shrink candidates evaluated in total
    pub max_shrink_candidates: u32,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            checks: 100,
            seed: 0,
            max_shrink_steps: 1000,
            max_shrink_candidates: 100_000,
        }
    }
}

impl CheckConfig {
    pub fn with_checks(mut self, checks: u32) -> Self {
        self.checks = checks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_shrink_steps(mut self, steps: u32) -> Self {
        self.max_shrink_steps = steps;
        self
    }

    pub fn with_max_shrink_candidates(mut self, candidates: u32) -> Self {
        self.max_shrink_candidates = candidates;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The producer itself failed, e.g. a filter that is never satisfied
    #[error("could not produce a value: {0}")]
    Produce(#[from] ProduceError),
}

/// A failing property, after minimization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Smallest failing value found
    pub counterexample: String,
    /// The failing value as first sampled
    pub original: String,
    pub expected: String,
    pub actual: String,
    pub shrink_steps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Passed,
    Failed(Failure),
}

/// Result of checking one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub name: String,
    /// Trials executed, including the failing one
    pub checks: u32,
    pub seed: u64,
    pub outcome: Outcome,
}

impl Evidence {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.outcome {
            Outcome::Passed => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }
}

struct Mismatch {
    expected: String,
    actual: String,
}

thread_local! {
    static QUIET: Cell<bool> = Cell::new(false);
}

static INSTALL_QUIET_HOOK: Once = Once::new();

// Silences the panic hook on the current thread while alive. Other threads
// keep reporting through whatever hook was installed before the first check.
struct QuietPanics {
    was_quiet: bool,
}

impl QuietPanics {
    fn enter() -> QuietPanics {
        INSTALL_QUIET_HOOK.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if !QUIET.try_with(Cell::get).unwrap_or(false) {
                    previous(info);
                }
            }));
        });
        QuietPanics {
            was_quiet: QUIET.with(|quiet| quiet.replace(true)),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        let was_quiet = self.was_quiet;
        QUIET.with(|quiet| quiet.set(was_quiet));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Check that `predicate` holds for every sampled value.
///
/// A panic in `predicate` counts as a failure. The panic that first exposes a
/// failure is reported by the panic hook as usual; panics raised while the
/// counterexample is being minimized are not, and only their message is kept.
pub fn check<T, P>(name: &str, producer: &Producer<T>, predicate: P, config: &CheckConfig) -> Result<Evidence, CheckError>
where
    T: Debug + 'static,
    P: Fn(&T) -> bool,
{
    run(
        name,
        producer,
        |value: &T| match catch_unwind(AssertUnwindSafe(|| predicate(value))) {
            Ok(true) => None,
            Ok(false) => Some(Mismatch {
                expected: "true".to_string(),
                actual: "false".to_string(),
            }),
            Err(payload) => Some(Mismatch {
                expected: "true".to_string(),
                actual: format!("panicked: {}", panic_message(payload.as_ref())),
            }),
        },
        config,
    )
}

/// Check that `actual` and `expected` agree on every sampled value.
pub fn check_that<T, A, F, G>(
    name: &str,
    producer: &Producer<T>,
    actual: F,
    expected: G,
    config: &CheckConfig,
) -> Result<Evidence, CheckError>
where
    T: Debug + 'static,
    A: PartialEq + Debug,
    F: Fn(&T) -> A,
    G: Fn(&T) -> A,
{
    run(
        name,
        producer,
        |value: &T| match catch_unwind(AssertUnwindSafe(|| (expected(value), actual(value)))) {
            Ok((expected, actual)) if actual == expected => None,
            Ok((expected, actual)) => Some(Mismatch {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", actual),
            }),
            Err(payload) => Some(Mismatch {
                expected: "no panic".to_string(),
                actual: format!("panicked: {}", panic_message(payload.as_ref())),
            }),
        },
        config,
    )
}

fn run<T, J>(name: &str, producer: &Producer<T>, judge: J, config: &CheckConfig) -> Result<Evidence, CheckError>
where
    T: Debug + 'static,
    J: Fn(&T) -> Option<Mismatch>,
{
    debug!("checking `{}`: {} trials from seed {}", name, config.checks, config.seed);
    let mut seed = Seed::new(config.seed);

    for trial in 1..=config.checks {
        let value = producer.draw(&mut seed)?;
        let mismatch = match judge(&value) {
            None => continue,
            Some(mismatch) => mismatch,
        };

        debug!("`{}` failed on trial {} with {:?}", name, trial, value);
        let original = format!("{:?}", value);
        let (minimal, mismatch, steps) = minimize(producer, value, mismatch, &judge, config);
        debug!("`{}` minimized to {:?} in {} steps", name, minimal, steps);

        return Ok(Evidence {
            name: name.to_string(),
            checks: trial,
            seed: config.seed,
            outcome: Outcome::Failed(Failure {
                counterexample: format!("{:?}", minimal),
                original,
                expected: mismatch.expected,
                actual: mismatch.actual,
                shrink_steps: steps,
            }),
        });
    }

    debug!("`{}` passed {} trials", name, config.checks);
    Ok(Evidence {
        name: name.to_string(),
        checks: config.checks,
        seed: config.seed,
        outcome: Outcome::Passed,
    })
}

fn minimize<T, J>(
    producer: &Producer<T>,
    value: T,
    mismatch: Mismatch,
    judge: &J,
    config: &CheckConfig,
) -> (T, Mismatch, u32)
where
    T: Debug + 'static,
    J: Fn(&T) -> Option<Mismatch>,
{
    let _quiet = QuietPanics::enter();
    let mut current = value;
    let mut mismatch = mismatch;
    let mut steps = 0;
    let mut evaluated = 0;

    'search: while steps < config.max_shrink_steps {
        for candidate in producer.shrink(&current) {
            if evaluated >= config.max_shrink_candidates {
                debug!("shrink candidate budget of {} exhausted", config.max_shrink_candidates);
                break 'search;
            }
            evaluated += 1;
            trace!("trying shrink candidate {:?}", candidate);
            if let Some(found) = judge(&candidate) {
                trace!("candidate fails: {}", found.actual);
                current = candidate;
                mismatch = found;
                steps += 1;
                continue 'search;
            }
        }
        break;
    }

    (current, mismatch, steps)
}
