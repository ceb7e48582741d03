//! Random Initial Weight Tables
//!
//! Used when no explicit weight files are supplied.

use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

/// Uniform Xavier-style initial tables for a fresh network.
///
/// Returns `(hidden, output)` shaped `[hidden_units][num_inputs + 1]` and
/// `[num_classes][hidden_units + 1]`, bias column last, exactly as the
/// network constructor expects.
pub fn xavier_tables(
    num_inputs: usize,
    hidden_units: usize,
    num_classes: usize,
    rng: &mut StdRng,
) -> (Array2<f64>, Array2<f64>) {
    let hidden = xavier_table(hidden_units, num_inputs + 1, rng);
    let output = xavier_table(num_classes, hidden_units + 1, rng);
    (hidden, output)
}

fn xavier_table(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f64> {
    let limit = (6.0 / (rows + cols) as f64).sqrt();
    Array2::random_using((rows, cols), Uniform::new(-limit, limit), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_table_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let (hidden, output) = xavier_tables(4, 3, 2, &mut rng);
        assert_eq!(hidden.dim(), (3, 5));
        assert_eq!(output.dim(), (2, 4));
    }

    #[test]
    fn test_values_within_xavier_limit() {
        let mut rng = StdRng::seed_from_u64(2);
        let (hidden, _) = xavier_tables(4, 3, 2, &mut rng);
        let limit = (6.0 / (3 + 5) as f64).sqrt();
        assert!(hidden.iter().all(|&w| w > -limit && w < limit));
    }

    #[test]
    fn test_same_seed_same_tables() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        assert_eq!(xavier_tables(4, 3, 2, &mut a), xavier_tables(4, 3, 2, &mut b));
    }
}
