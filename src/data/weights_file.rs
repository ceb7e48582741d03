//! Initial-Weight Table Files
//!
//! Plain-text weight tables: one row per line, values separated by commas
//! or whitespace. Blank lines and `#` comment lines are skipped.

use anyhow::{ensure, Result};
use ndarray::Array2;

/// Parse a weight table of exactly `rows` x `cols` values from `path`.
pub fn load_weight_table(path: &str, rows: usize, cols: usize) -> Result<Array2<f64>> {
    let content = std::fs::read_to_string(path)?;

    let mut values = Vec::with_capacity(rows * cols);
    let mut row_count = 0usize;
    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        ensure!(
            fields.len() == cols,
            "{}:{}: found {} values, expected {}",
            path,
            line_number + 1,
            fields.len(),
            cols
        );
        for field in fields {
            values.push(field.parse::<f64>()?);
        }
        row_count += 1;
    }
    ensure!(
        row_count == rows,
        "{}: found {} weight rows, expected {}",
        path,
        row_count,
        rows
    );

    Ok(Array2::from_shape_vec((rows, cols), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_comments_and_mixed_separators() {
        let path = std::env::temp_dir().join("rust_nn_classifier_weights_test.txt");
        std::fs::write(&path, "# hidden weights\n0.5, -0.25 0.1\n\n1.0 2.0,3.0\n").unwrap();
        let table = load_weight_table(path.to_str().unwrap(), 2, 3).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table[[0, 1]], -0.25);
        assert_eq!(table[[1, 2]], 3.0);
    }

    #[test]
    fn test_rejects_wrong_row_count() {
        let path = std::env::temp_dir().join("rust_nn_classifier_short_weights_test.txt");
        std::fs::write(&path, "0.1 0.2\n").unwrap();
        let result = load_weight_table(path.to_str().unwrap(), 2, 2);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
