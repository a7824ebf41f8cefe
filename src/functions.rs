//! # Generated functions
//!
//! `func1` through `func5` produce pure functions of one to five arguments
//! whose results come from a codomain producer. A generated [`Function`]
//! keeps no memo table. Each call derives a fresh seed by feeding the
//! function's key and the arguments' [`Hash`] into SHA-256, then samples the
//! codomain with it. Equal arguments therefore always give equal results, and
//! a `Function` can be shared across threads freely.
//!
//! Arguments must implement `Hash`. Types whose hash depends on iteration
//! order, such as `HashMap` and `HashSet`, do not, so they cannot be passed;
//! use `BTreeMap` and `BTreeSet` instead.
//!
//! Generated functions are opaque: they never shrink.
//!
//! ```rust
//! use conjecture_producer::{functions::func2, ints::int, Seed};
//!
//! let (f, _) = func2::<i64, String, _>(int()).sample(Seed::new(1))?;
//! assert_eq!(f.apply(3, "x".to_string()), f.apply(3, "x".to_string()));
//! # Ok::<(), conjecture_producer::ProduceError>(())
//! ```
//!
//! ```compile_fail
//! use conjecture_producer::{functions::func1, ints::int, Seed};
//! use std::collections::HashMap;
//!
//! let (f, _) = func1::<HashMap<i64, i64>, _>(int()).sample(Seed::new(1)).unwrap();
//! f.apply(HashMap::new());
//! ```

use crate::producer::{Draw, Producer};
use crate::seed::Seed;

use byteorder::{ByteOrder, LittleEndian};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A generated pure function from the argument tuple `Args` to `R`.
pub struct Function<Args, R> {
    key: u64,
    arity: u32,
    codomain: Producer<R>,
    _args: PhantomData<fn(Args)>,
}

impl<Args, R> Clone for Function<Args, R> {
    fn clone(&self) -> Self {
        Function {
            key: self.key,
            arity: self.arity,
            codomain: self.codomain.clone(),
            _args: PhantomData,
        }
    }
}

impl<Args, R> fmt::Debug for Function<Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function/{}>", self.arity)
    }
}

// Routes `Hash` output into a SHA-256 digest.
struct DigestHasher(Sha256);

impl Hasher for DigestHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(&self) -> u64 {
        LittleEndian::read_u64(&self.0.clone().finalize()[..8])
    }
}

impl<Args: Hash, R: 'static> Function<Args, R> {
    /// Call the function, reporting codomain failures instead of panicking.
    pub fn try_call(&self, args: &Args) -> Draw<R> {
        self.codomain.draw(&mut self.seed_for(args))
    }

    /// # Panics
    ///
    /// If the codomain cannot produce a value (an unsatisfiable filter).
    pub fn call(&self, args: &Args) -> R {
        match self.try_call(args) {
            Ok(value) => value,
            Err(err) => panic!("generated function failed: {}", err),
        }
    }

    fn seed_for(&self, args: &Args) -> Seed {
        let mut header = [0u8; 12];
        LittleEndian::write_u64(&mut header[..8], self.key);
        LittleEndian::write_u32(&mut header[8..], self.arity);

        let mut hasher = DigestHasher(Sha256::new());
        hasher.write(&header);
        args.hash(&mut hasher);
        Seed::from_bytes(hasher.0.finalize().into())
    }
}

fn function_producer<Args: 'static, R: 'static>(arity: u32, codomain: Producer<R>) -> Producer<Function<Args, R>> {
    Producer::unshrinkable(move |seed: &mut Seed| {
        Ok(Function {
            key: seed.next_u64(),
            arity,
            codomain: codomain.clone(),
            _args: PhantomData,
        })
    })
}

macro_rules! function_arity {
    ($(#[$meta:meta])* $name:ident, $arity:expr => $($arg:ident: $ty:ident),+) => {
        $(#[$meta])*
        pub fn $name<$($ty: 'static,)+ R: 'static>(codomain: Producer<R>) -> Producer<Function<($($ty,)+), R>> {
            function_producer($arity, codomain)
        }

        impl<$($ty: Hash,)+ R: 'static> Function<($($ty,)+), R> {
            pub fn apply(&self, $($arg: $ty),+) -> R {
                self.call(&($($arg,)+))
            }
        }
    };
}

function_arity!(
    /// Functions of one argument.
    func1, 1 => a: A
);
function_arity!(func2, 2 => a: A, b: B);
function_arity!(func3, 3 => a: A, b: B, c: C);
function_arity!(func4, 4 => a: A, b: B, c: C, d: D);
function_arity!(func5, 5 => a: A, b: B, c: C, d: D, e: E);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ints::{int, range_int};
    use crate::producer::ProduceError;
    use crate::strings::string;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn test_same_arguments_same_result() {
        let (f, _) = func1::<i64, _>(int()).sample(Seed::new(5)).unwrap();
        for x in -20..20 {
            assert_eq!(f.apply(x), f.apply(x));
            assert_eq!(f.apply(x), f.clone().apply(x));
        }
    }

    #[test]
    fn test_functions_vary_with_arguments_and_key() {
        let producer = func1::<i64, _>(range_int(0, 1_000_000));
        let (f, next) = producer.sample(Seed::new(5)).unwrap();
        let (g, _) = producer.sample(next).unwrap();
        let outputs: Vec<i64> = (0..20).map(|x| f.apply(x)).collect();
        assert!(outputs.iter().any(|y| *y != outputs[0]));
        assert!((0..20).any(|x| f.apply(x) != g.apply(x)));
    }

    #[test]
    fn test_results_stay_in_codomain() {
        let (f, _) = func3::<bool, char, String, _>(range_int(-2, 2)).sample(Seed::new(9)).unwrap();
        for x in 0..50 {
            let y = f.apply(x % 2 == 0, 'q', x.to_string());
            assert!((-2..=2).contains(&y));
        }
    }

    #[test]
    fn test_every_arity() {
        let mut seed = Seed::new(0);
        let f2 = func2::<u8, u8, _>(string()).draw(&mut seed).unwrap();
        let f4 = func4::<u8, u8, u8, u8, _>(int()).draw(&mut seed).unwrap();
        let f5 = func5::<u8, u8, u8, u8, u8, _>(int()).draw(&mut seed).unwrap();
        assert_eq!(f2.apply(1, 2), f2.apply(1, 2));
        assert_eq!(f4.apply(1, 2, 3, 4), f4.apply(1, 2, 3, 4));
        assert_eq!(f5.apply(1, 2, 3, 4, 5), f5.apply(1, 2, 3, 4, 5));
        assert_eq!(format!("{:?}", f5), "<function/5>");
    }

    #[test]
    fn test_functions_do_not_shrink() {
        let producer = func1::<i64, _>(int());
        let f = producer.draw(&mut Seed::new(3)).unwrap();
        assert!(producer.shrink(&f).next().is_none());
    }

    #[test]
    fn test_try_call_reports_unsatisfiable_codomain() {
        let (f, _) = func1::<i64, _>(int().keep_if_within(3, |_| false)).sample(Seed::new(0)).unwrap();
        assert_eq!(f.try_call(&(1,)).unwrap_err(), ProduceError::Unsatisfiable { attempts: 3 });
    }

    #[test]
    fn test_functions_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let f = func2::<i64, i64, _>(int()).draw(&mut Seed::new(0)).unwrap();
        assert_send_sync(&f);
        let handle = std::thread::spawn(move || f.apply(1, 2));
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_equal_maps_give_equal_results_regardless_of_insertion_order() {
        let (f, _) = func1::<BTreeMap<i64, i64>, _>(range_int(0, 1_000_000)).sample(Seed::new(17)).unwrap();
        for size in 0..50i64 {
            let forward: BTreeMap<i64, i64> = (0..size).map(|k| (k, k * 7)).collect();
            let backward: BTreeMap<i64, i64> = (0..size).rev().map(|k| (k, k * 7)).collect();
            assert_eq!(forward, backward);
            assert_eq!(f.apply(forward), f.apply(backward));
        }

        let (g, _) = func1::<BTreeSet<String>, _>(int()).sample(Seed::new(18)).unwrap();
        let words = ["pear", "fig", "apple"];
        let forward: BTreeSet<String> = words.iter().map(|w| w.to_string()).collect();
        let backward: BTreeSet<String> = words.iter().rev().map(|w| w.to_string()).collect();
        assert_eq!(g.apply(forward), g.apply(backward));
    }

    #[test]
    fn test_tuple_keyed_maps_are_valid_arguments() {
        let (f, _) = func1::<BTreeMap<(u8, u8), u8>, _>(range_int(-5, 5)).sample(Seed::new(2)).unwrap();
        let mut map = BTreeMap::new();
        map.insert((1, 2), 3);
        map.insert((4, 5), 6);
        assert!(f.try_call(&(map.clone(),)).is_ok());
        let y = f.apply(map.clone());
        assert!((-5..=5).contains(&y));
        assert_eq!(f.apply(map), y);
    }

    #[test]
    fn test_digest_hasher_is_deterministic() {
        let digest = |value: &(u8, String)| {
            let mut hasher = DigestHasher(Sha256::new());
            value.hash(&mut hasher);
            hasher.finish()
        };
        let a = (1u8, "x".to_string());
        assert_eq!(digest(&a), digest(&a.clone()));
        assert_ne!(digest(&a), digest(&(2u8, "x".to_string())));
    }
}
