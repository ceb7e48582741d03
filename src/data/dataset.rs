//! Labeled Examples and Datasets
//!
//! A dataset is an ordered sequence of examples, each an attribute vector
//! plus a one-hot label vector over the classes. CSV records carry the
//! attributes first and an integer class label in the last column.

use anyhow::{ensure, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// One-hot label vector with a 1.0 at `class`.
pub fn one_hot(class: usize, num_classes: usize) -> Array1<f64> {
    let mut label = Array1::zeros(num_classes);
    label[class] = 1.0;
    label
}

/// A single labeled example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    /// Raw attribute values, one per input unit
    pub attributes: Array1<f64>,
    /// One-hot (or soft) label vector, one entry per class
    pub label: Array1<f64>,
}

impl Example {
    pub fn new(attributes: Array1<f64>, label: Array1<f64>) -> Self {
        Self { attributes, label }
    }

    /// Index of the labeled class (first maximum of the label vector).
    pub fn class_index(&self) -> usize {
        let mut best = 0;
        let mut max = f64::NEG_INFINITY;
        for (k, &value) in self.label.iter().enumerate() {
            if value > max {
                best = k;
                max = value;
            }
        }
        best
    }
}

/// Ordered collection of labeled examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    pub fn from_examples(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Attribute count of the examples (0 for an empty dataset).
    pub fn num_attributes(&self) -> usize {
        self.examples.first().map_or(0, |e| e.attributes.len())
    }

    /// Class count of the examples (0 for an empty dataset).
    pub fn num_classes(&self) -> usize {
        self.examples.first().map_or(0, |e| e.label.len())
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn into_examples(self) -> Vec<Example> {
        self.examples
    }

    /// Split into a leading and trailing part, keeping order. `fraction` is
    /// the share of examples in the first part, clamped to [0, 1].
    pub fn split(self, fraction: f64) -> (Dataset, Dataset) {
        let cut = (self.examples.len() as f64 * fraction.clamp(0.0, 1.0)) as usize;
        let mut head = self.examples;
        let tail = head.split_off(cut.min(head.len()));
        (Dataset::from_examples(head), Dataset::from_examples(tail))
    }

    /// Load a dataset from a CSV file.
    ///
    /// Every record is `attr_0, ..., attr_{n-1}, class` with `class` a
    /// non-negative integer. When `num_classes` is `None` the class count is
    /// inferred as the largest label plus one. Empty files, ragged rows,
    /// unparseable fields and out-of-range labels are errors.
    pub fn load_csv(path: &str, num_classes: Option<usize>, has_header: bool) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows: Vec<(Vec<f64>, usize)> = Vec::new();
        for result in reader.records() {
            let record = result?;
            ensure!(
                record.len() >= 2,
                "{}: record {} needs at least one attribute and a class label",
                path,
                rows.len() + 1
            );
            let mut attributes = Vec::with_capacity(record.len() - 1);
            for field in record.iter().take(record.len() - 1) {
                attributes.push(field.parse::<f64>()?);
            }
            let class: usize = record[record.len() - 1].parse()?;
            rows.push((attributes, class));
        }
        ensure!(!rows.is_empty(), "{}: no records", path);

        let width = rows[0].0.len();
        ensure!(
            rows.iter().all(|(attributes, _)| attributes.len() == width),
            "{}: records have inconsistent attribute counts",
            path
        );

        let max_class = rows.iter().map(|&(_, class)| class).max().unwrap_or(0);
        let classes = num_classes.unwrap_or(max_class + 1);
        ensure!(
            max_class < classes,
            "{}: class label {} out of range for {} classes",
            path,
            max_class,
            classes
        );

        let examples = rows
            .into_iter()
            .map(|(attributes, class)| {
                Example::new(Array1::from_vec(attributes), one_hot(class, classes))
            })
            .collect();
        Ok(Self { examples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_one_hot() {
        let label = one_hot(1, 3);
        assert_eq!(label, arr1(&[0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_class_index_first_max_wins() {
        let example = Example::new(arr1(&[0.0]), arr1(&[0.5, 0.5, 0.0]));
        assert_eq!(example.class_index(), 0);
    }

    #[test]
    fn test_split_keeps_order() {
        let examples: Vec<Example> = (0..5)
            .map(|i| Example::new(arr1(&[i as f64]), one_hot(0, 2)))
            .collect();
        let (train, test) = Dataset::from_examples(examples).split(0.8);
        assert_eq!(train.len(), 4);
        assert_eq!(test.len(), 1);
        assert_eq!(test.examples()[0].attributes[0], 4.0);
    }

    #[test]
    fn test_load_csv_infers_classes() {
        let path = std::env::temp_dir().join("rust_nn_classifier_dataset_test.csv");
        std::fs::write(&path, "1.0,2.0,0\n3.0,4.0,2\n5.0,6.0,1\n").unwrap();
        let dataset = Dataset::load_csv(path.to_str().unwrap(), None, false).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.num_attributes(), 2);
        assert_eq!(dataset.num_classes(), 3);
        assert_eq!(dataset.examples()[1].class_index(), 2);
    }

    #[test]
    fn test_load_csv_rejects_out_of_range_label() {
        let path = std::env::temp_dir().join("rust_nn_classifier_bad_label_test.csv");
        std::fs::write(&path, "1.0,2.0,5\n").unwrap();
        let result = Dataset::load_csv(path.to_str().unwrap(), Some(2), false);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
