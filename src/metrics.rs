//! Classification metrics and evaluation reports.

use ndarray::Array2;

use crate::data::Dataset;
use crate::nn::Network;

/// Fraction of predictions matching the true class
pub fn accuracy(predictions: &[usize], truths: &[usize]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(truths)
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / predictions.len() as f64
}

/// Confusion matrix with rows = actual class, columns = predicted class
pub fn confusion_matrix(
    predictions: &[usize],
    truths: &[usize],
    num_classes: usize,
) -> Array2<usize> {
    let mut matrix = Array2::zeros((num_classes, num_classes));
    for (&predicted, &actual) in predictions.iter().zip(truths) {
        matrix[[actual, predicted]] += 1;
    }
    matrix
}

/// Evaluation summary over a dataset
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub mean_loss: f64,
    pub num_examples: usize,
    pub confusion: Array2<usize>,
}

impl EvaluationReport {
    /// Run the network over every example and collect the metrics.
    pub fn from_network(network: &mut Network, dataset: &Dataset) -> Self {
        let mut predictions = Vec::with_capacity(dataset.len());
        let mut truths = Vec::with_capacity(dataset.len());
        let mut total_loss = 0.0;

        for example in dataset.examples() {
            predictions.push(network.predict(example));
            truths.push(example.class_index());
            total_loss += network.loss(example);
        }

        let num_examples = dataset.len();
        let mean_loss = if num_examples > 0 {
            total_loss / num_examples as f64
        } else {
            0.0
        };

        Self {
            accuracy: accuracy(&predictions, &truths),
            mean_loss,
            num_examples,
            confusion: confusion_matrix(&predictions, &truths, network.num_classes()),
        }
    }
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Evaluation Report:")?;
        writeln!(f, "  Examples:       {:>10}", self.num_examples)?;
        writeln!(f, "  Accuracy:       {:>10.2}%", self.accuracy * 100.0)?;
        writeln!(f, "  Mean CE Loss:   {:>10.6}", self.mean_loss)?;
        writeln!(f, "  Confusion matrix (rows = actual):")?;
        for row in self.confusion.rows() {
            write!(f, "   ")?;
            for &count in row {
                write!(f, " {:>6}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{one_hot, Example};
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_accuracy() {
        assert_relative_eq!(
            accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]),
            0.75,
            epsilon = 1e-12
        );
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix_layout() {
        let matrix = confusion_matrix(&[0, 1, 1], &[0, 0, 1], 2);
        assert_eq!(matrix[[0, 0]], 1); // actual 0, predicted 0
        assert_eq!(matrix[[0, 1]], 1); // actual 0, predicted 1
        assert_eq!(matrix[[1, 1]], 1);
        assert_eq!(matrix[[1, 0]], 0);
    }

    #[test]
    fn test_report_on_zero_weight_network() {
        // With all-zero weights the softmax is uniform and the network
        // always predicts class 0.
        let examples = vec![
            Example::new(arr1(&[1.0]), one_hot(0, 2)),
            Example::new(arr1(&[2.0]), one_hot(1, 2)),
        ];
        let dataset = Dataset::from_examples(examples);
        let hidden = arr2(&[[0.0, 0.0]]);
        let output = arr2(&[[0.0, 0.0], [0.0, 0.0]]);
        let mut network = Network::new(
            dataset.clone(),
            1,
            0.1,
            1,
            StdRng::seed_from_u64(0),
            &hidden,
            &output,
        )
        .unwrap();

        let report = EvaluationReport::from_network(&mut network, &dataset);
        assert_eq!(report.num_examples, 2);
        assert_relative_eq!(report.accuracy, 0.5, epsilon = 1e-12);
        assert_relative_eq!(report.mean_loss, 2.0f64.ln(), epsilon = 1e-12);
        assert_eq!(report.confusion[[1, 0]], 1);
    }
}
