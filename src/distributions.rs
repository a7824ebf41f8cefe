// Branch selection for base producers.
// `weighted` flips a biased coin; `Sampler` picks one of a few branches in
// proportion to fixed weights using an alias table.

use crate::seed::Seed;

/// True with the given probability. `0.0` is never true and `1.0` always is.
pub fn weighted(seed: &mut Seed, probability: f64) -> bool {
    seed.next_f64() < probability
}

/// Uniform in `[0, max]` by rejection on the smallest covering bit width.
pub fn bounded_int(seed: &mut Seed, max: u64) -> u64 {
    let bitlength = 64 - max.leading_zeros() as u64;
    if bitlength == 0 {
        return 0;
    }
    loop {
        let probe = seed.next_u64() >> (64 - bitlength);
        if probe <= max {
            return probe;
        }
    }
}

// One column of the alias table: `primary` unless the coin says `alternate`.
#[derive(Debug, Clone)]
struct Column {
    primary: usize,
    alternate: usize,
    use_alternate: f64,
}

/// Picks an index with probability proportional to its weight, in constant
/// time per sample.
#[derive(Debug, Clone)]
pub struct Sampler {
    columns: Vec<Column>,
}

impl Sampler {
    /// # Panics
    ///
    /// If `weights` is empty, any weight is negative, or they sum to zero.
    pub fn new(weights: &[f64]) -> Sampler {
        assert!(!weights.is_empty(), "Sampler needs at least one weight");
        assert!(
            weights.iter().all(|w| *w >= 0.0),
            "Sampler weights must be non-negative"
        );
        let total: f64 = weights.iter().sum();
        assert!(total > 0.0, "Sampler weights must not all be zero");

        // Scale so the average weight is 1, then pair each light entry with
        // a heavy one that tops its column up to 1.
        let n = weights.len() as f64;
        let mut scaled: Vec<f64> = weights.iter().map(|w| w * n / total).collect();
        let (mut light, mut heavy): (Vec<usize>, Vec<usize>) = (0..weights.len()).partition(|&i| scaled[i] < 1.0);

        let mut columns = Vec::with_capacity(weights.len());
        while let (Some(&lo), Some(&hi)) = (light.last(), heavy.last()) {
            light.pop();
            columns.push(Column {
                primary: lo,
                alternate: hi,
                use_alternate: 1.0 - scaled[lo],
            });
            scaled[hi] -= 1.0 - scaled[lo];
            if scaled[hi] < 1.0 {
                heavy.pop();
                light.push(hi);
            }
        }

        // Whatever is left has weight 1 up to rounding.
        columns.extend(light.into_iter().chain(heavy).map(|i| Column {
            primary: i,
            alternate: i,
            use_alternate: 0.0,
        }));
        Sampler { columns }
    }

    pub fn sample(&self, seed: &mut Seed) -> usize {
        let column = &self.columns[bounded_int(seed, self.columns.len() as u64 - 1) as usize];
        if weighted(seed, column.use_alternate) {
            column.alternate
        } else {
            column.primary
        }
    }
}
