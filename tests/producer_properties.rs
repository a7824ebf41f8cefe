//! Properties of composed producers, exercised through the public API and the
//! evaluation loop.

use conjecture_producer::basics::bool;
use conjecture_producer::collections::{list, maybe};
use conjecture_producer::floats::percentage;
use conjecture_producer::functions::func1;
use conjecture_producer::ints::{int, range_int};
use conjecture_producer::strings::string;
use conjecture_producer::tuples::tuple2;
use conjecture_producer::{check, CheckConfig, Investigator, ProduceError, Producer, Seed};

fn config() -> CheckConfig {
    CheckConfig::default().with_seed(2024)
}

fn draw_many<T: 'static>(producer: &Producer<T>, seed: u64, count: usize) -> Vec<T> {
    let mut seed = Seed::new(seed);
    (0..count).map(|_| producer.draw(&mut seed).unwrap()).collect()
}

#[test]
fn test_range_int_is_reproducible_and_bounded() {
    let producer = range_int(1, 10);
    let first = draw_many(&producer, 99, 1000);
    let second = draw_many(&producer, 99, 1000);
    assert_eq!(first, second);
    assert!(first.iter().all(|x| (1..=10).contains(x)));
    for x in 1..=10 {
        assert!(first.contains(&x), "{} never sampled", x);
    }
}

#[test]
fn test_shrink_candidates_stay_in_domain() {
    let producer = range_int(5, 50);
    for value in draw_many(&producer, 1, 100) {
        assert!(producer.shrink(&value).all(|c| (5..=50).contains(&c) && c != value));
    }

    let unit = percentage();
    for value in draw_many(&unit, 1, 100) {
        assert!(unit.shrink(&value).all(|c| (0.0..=1.0).contains(&c)));
    }
}

#[test]
fn test_list_minimizes_to_single_zero() {
    let evidence = check("lists are empty", &list(int()), |xs| xs.is_empty(), &config()).unwrap();
    let failure = evidence.failure().unwrap();
    assert_eq!(failure.counterexample, "[0]");
}

#[test]
fn test_list_offers_empty_first() {
    let producer = list(int());
    for items in draw_many(&producer, 7, 50) {
        if !items.is_empty() {
            assert_eq!(producer.shrink(&items).next(), Some(vec![]));
        }
    }
}

#[test]
fn test_convert_shrinks_through_inverse() {
    let lengths = string().convert(|s: String| s.len(), |n: &usize| "a".repeat(*n));
    assert_eq!(lengths.shrink(&7).next(), Some(0));

    let evidence = check("lengths are between 1 and 6", &lengths, |n| *n > 0 && *n < 7, &config()).unwrap();
    assert_eq!(evidence.failure().unwrap().counterexample, "0");
}

#[test]
fn test_keep_if_minimizes_within_filter() {
    let evens = range_int(0, 1000).keep_if(|x| x % 2 == 0);
    for value in draw_many(&evens, 3, 200) {
        assert_eq!(value % 2, 0);
    }
    let evidence = check("evens are small", &evens, |x| *x < 11, &config()).unwrap();
    assert_eq!(evidence.failure().unwrap().counterexample, "12");
}

#[test]
fn test_filter_exhaustion_is_reported() {
    let impossible = bool().keep_if_within(5, |_| false);
    assert_eq!(
        impossible.sample(Seed::new(0)).unwrap_err(),
        ProduceError::Unsatisfiable { attempts: 5 }
    );
}

#[test]
fn test_tuple2_minimizes_to_boundary() {
    let pairs = tuple2(range_int(0, 100), range_int(0, 100));
    let evidence = check("sums are small", &pairs, |(a, b)| a + b < 50, &config()).unwrap();
    let counterexample = &evidence.failure().unwrap().counterexample;
    let parts: Vec<i64> = counterexample
        .trim_matches(|c| c == '(' || c == ')')
        .split(", ")
        .map(|part| part.parse().unwrap())
        .collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0] + parts[1], 50, "{}", counterexample);
}

#[test]
fn test_map_keeps_generation_but_not_shrinking() {
    let doubled = range_int(0, 10).map(|x| x * 2);
    let values = draw_many(&doubled, 5, 100);
    assert!(values.iter().all(|x| x % 2 == 0 && (0..=20).contains(x)));

    let evidence = check("doubles are small", &doubled, |x| *x < 10, &config()).unwrap();
    let failure = evidence.failure().unwrap();
    assert_eq!(failure.shrink_steps, 0);
    assert_eq!(failure.counterexample, failure.original);
}

#[test]
fn test_maybe_of_list_nests() {
    let producer = maybe(list(range_int(0, 3)));
    let value = Some(vec![2, 3]);
    let candidates: Vec<Option<Vec<i64>>> = producer.shrink(&value).collect();
    assert_eq!(candidates[0], None);
    assert_eq!(candidates[1], Some(vec![]));
}

#[test]
fn test_generated_functions_are_stable_across_threads() {
    let (f, _) = func1::<u8, _>(range_int(0, 1_000)).sample(Seed::new(12)).unwrap();
    let expected: Vec<i64> = (0..=255u8).map(|x| f.apply(x)).collect();
    let handle = {
        let f = f.clone();
        std::thread::spawn(move || (0..=255u8).map(|x| f.apply(x)).collect::<Vec<i64>>())
    };
    assert_eq!(handle.join().unwrap(), expected);
}

#[test]
fn test_investigator_is_a_producer() {
    let legacy: Investigator<i64> = range_int(0, 3);
    let (value, _) = legacy.sample(Seed::new(0)).unwrap();
    assert!((0..=3).contains(&value));
}
