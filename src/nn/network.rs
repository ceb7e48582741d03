//! Three-Layer Feedforward Network
//!
//! Owns the input, hidden and output layers of units, wires them from
//! explicit initial weight tables, and drives inference and the
//! per-example stochastic gradient descent training loop.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::{ensure, Result};

use super::unit::{Unit, UnitRole};
use crate::data::{Dataset, Example};

/// Outputs of one forward pass, layer by layer.
struct ForwardPass {
    input: Vec<f64>,
    hidden: Vec<f64>,
    probs: Vec<f64>,
}

/// Persisted weight tables.
#[derive(Serialize, Deserialize)]
struct StoredModel {
    hidden_weights: Array2<f64>,
    output_weights: Array2<f64>,
}

/// Feedforward network: attributes -> ReLU hidden layer -> softmax outputs.
///
/// The last unit of the input layer is the bias-to-hidden unit and the last
/// unit of the hidden layer is the bias-to-output unit; both are wired into
/// downstream units as ordinary trailing connections. All units and weights
/// are constructed once and then mutated in place by training.
pub struct Network {
    input_layer: Vec<Unit>,
    hidden_layer: Vec<Unit>,
    output_layer: Vec<Unit>,
    examples: Vec<Example>,
    learning_rate: f64,
    max_epochs: usize,
    rng: StdRng,
}

impl Network {
    /// Build the layered unit graph from a training set and two initial
    /// weight tables.
    ///
    /// The training set fixes the layer sizes: one input unit per attribute
    /// plus the bias-to-hidden unit, `hidden_units` hidden units plus the
    /// bias-to-output unit, and one output unit per class. `hidden_weights`
    /// must be shaped `[hidden_units][attributes + 1]` and `output_weights`
    /// `[classes][hidden_units + 1]`; the trailing column of each table is
    /// the bias weight. Construction fails if the training set is empty or
    /// any dimension disagrees.
    pub fn new(
        dataset: Dataset,
        hidden_units: usize,
        learning_rate: f64,
        max_epochs: usize,
        rng: StdRng,
        hidden_weights: &Array2<f64>,
        output_weights: &Array2<f64>,
    ) -> Result<Self> {
        ensure!(
            !dataset.is_empty(),
            "training set is empty, layer sizes cannot be inferred"
        );
        ensure!(hidden_units > 0, "hidden unit count must be positive");
        ensure!(learning_rate > 0.0, "learning rate must be positive");

        let num_inputs = dataset.num_attributes();
        let num_outputs = dataset.num_classes();
        ensure!(
            hidden_weights.dim() == (hidden_units, num_inputs + 1),
            "hidden weight table is {:?}, expected ({}, {})",
            hidden_weights.dim(),
            hidden_units,
            num_inputs + 1
        );
        ensure!(
            output_weights.dim() == (num_outputs, hidden_units + 1),
            "output weight table is {:?}, expected ({}, {})",
            output_weights.dim(),
            num_outputs,
            hidden_units + 1
        );

        let mut input_layer: Vec<Unit> =
            (0..num_inputs).map(|_| Unit::new(UnitRole::Input)).collect();
        input_layer.push(Unit::new(UnitRole::BiasToHidden));

        let mut hidden_layer = Vec::with_capacity(hidden_units + 1);
        for i in 0..hidden_units {
            let mut unit = Unit::new(UnitRole::Hidden);
            for j in 0..input_layer.len() {
                unit.add_connection(j, hidden_weights[[i, j]]);
            }
            hidden_layer.push(unit);
        }
        hidden_layer.push(Unit::new(UnitRole::BiasToOutput));

        let mut output_layer = Vec::with_capacity(num_outputs);
        for i in 0..num_outputs {
            let mut unit = Unit::new(UnitRole::Output);
            for j in 0..hidden_layer.len() {
                unit.add_connection(j, output_weights[[i, j]]);
            }
            output_layer.push(unit);
        }

        Ok(Self {
            input_layer,
            hidden_layer,
            output_layer,
            examples: dataset.into_examples(),
            learning_rate,
            max_epochs,
            rng,
        })
    }

    /// Number of attribute inputs (excluding the bias unit).
    pub fn num_attributes(&self) -> usize {
        self.input_layer.len() - 1
    }

    /// Number of hidden units (excluding the bias unit).
    pub fn hidden_units(&self) -> usize {
        self.hidden_layer.len() - 1
    }

    /// Number of output classes.
    pub fn num_classes(&self) -> usize {
        self.output_layer.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    fn load_attributes(&mut self, attributes: &Array1<f64>) {
        for (unit, &value) in self.input_layer.iter_mut().zip(attributes.iter()) {
            unit.set_input(value);
        }
    }

    /// One full forward recomputation from the current weights. Softmax is
    /// normalized across the output layer here, not per unit. There is no
    /// max-subtraction shift, so extreme pre-activations can overflow exp().
    fn forward(&self) -> ForwardPass {
        let input: Vec<f64> = self.input_layer.iter().map(|u| u.output(&[])).collect();
        let hidden: Vec<f64> = self.hidden_layer.iter().map(|u| u.output(&input)).collect();
        let mut probs: Vec<f64> = self
            .output_layer
            .iter()
            .map(|u| u.output(&hidden).exp())
            .collect();
        let denominator: f64 = probs.iter().sum();
        for p in &mut probs {
            *p /= denominator;
        }
        ForwardPass {
            input,
            hidden,
            probs,
        }
    }

    /// Softmax probabilities over the output classes for one example.
    pub fn class_probabilities(&mut self, example: &Example) -> Vec<f64> {
        self.load_attributes(&example.attributes);
        self.forward().probs
    }

    /// Predicted class index for one example.
    ///
    /// The first index achieving the maximum probability wins; the running
    /// maximum starts at 0.0, which every softmax output exceeds.
    pub fn predict(&mut self, example: &Example) -> usize {
        let probs = self.class_probabilities(example);
        let mut best = 0;
        let mut max = 0.0;
        for (k, &p) in probs.iter().enumerate() {
            if p > max {
                best = k;
                max = p;
            }
        }
        best
    }

    /// Cross-entropy loss `-sum_k label_k * ln(softmax_k)` for one example.
    pub fn loss(&mut self, example: &Example) -> f64 {
        let probs = self.class_probabilities(example);
        -example
            .label
            .iter()
            .zip(&probs)
            .map(|(&y, &p)| y * p.ln())
            .sum::<f64>()
    }

    /// Current hidden-layer weights as a `[hidden][input + 1]` table.
    pub fn hidden_weight_table(&self) -> Array2<f64> {
        let rows = self.hidden_layer.len() - 1;
        let cols = self.input_layer.len();
        Array2::from_shape_fn((rows, cols), |(i, j)| {
            self.hidden_layer[i].connections()[j].weight
        })
    }

    /// Current output-layer weights as a `[output][hidden + 1]` table.
    pub fn output_weight_table(&self) -> Array2<f64> {
        let rows = self.output_layer.len();
        let cols = self.hidden_layer.len();
        Array2::from_shape_fn((rows, cols), |(i, j)| {
            self.output_layer[i].connections()[j].weight
        })
    }

    /// One SGD step on a single example.
    ///
    /// The fixed order is load attributes, snapshot the output weights,
    /// forward pass, output deltas and updates, hidden deltas and updates.
    /// The snapshot must be taken before the output-layer update so hidden
    /// deltas see the pre-update weights.
    fn train_example(&mut self, example: &Example) {
        self.load_attributes(&example.attributes);

        let frozen = self.output_weight_table();
        let pass = self.forward();

        let mut output_deltas = vec![0.0; self.output_layer.len()];
        for k in 0..self.output_layer.len() {
            let delta = self.output_layer[k].compute_delta(
                &example.label,
                pass.probs[k],
                &output_deltas,
                k,
                &frozen,
            );
            output_deltas[k] = delta;
            self.output_layer[k].update_weights(self.learning_rate, delta, &pass.hidden);
        }

        // Full hidden range: the trailing bias unit has no connections, so
        // its delta and update calls are no-ops.
        for k in 0..self.hidden_layer.len() {
            let delta = self.hidden_layer[k].compute_delta(
                &example.label,
                pass.hidden[k],
                &output_deltas,
                k,
                &frozen,
            );
            self.hidden_layer[k].update_weights(self.learning_rate, delta, &pass.input);
        }
    }

    /// Run one epoch: shuffle the training set in place, take one SGD step
    /// per example, then return the mean cross-entropy loss over the full
    /// (updated) training set.
    pub fn run_epoch(&mut self, epoch: usize) -> f64 {
        let mut examples = std::mem::take(&mut self.examples);
        examples.shuffle(&mut self.rng);
        for example in &examples {
            self.train_example(example);
        }
        let total: f64 = examples.iter().map(|e| self.loss(e)).sum();
        let mean = total / examples.len() as f64;
        self.examples = examples;
        log::info!("epoch {}: loss = {:.8e}", epoch, mean);
        mean
    }

    /// Train for the configured number of epochs and return the per-epoch
    /// mean losses. Training is purely epoch-count-driven; there is no
    /// early stopping.
    pub fn train(&mut self) -> Vec<f64> {
        let mut losses = Vec::with_capacity(self.max_epochs);
        for epoch in 0..self.max_epochs {
            losses.push(self.run_epoch(epoch));
        }
        losses
    }

    /// Save both weight tables as JSON.
    pub fn save(&self, path: &str) -> Result<()> {
        let model = StoredModel {
            hidden_weights: self.hidden_weight_table(),
            output_weights: self.output_weight_table(),
        };
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &model)?;
        Ok(())
    }

    /// Load weight tables saved with [`Network::save`].
    pub fn load_weights(path: &str) -> Result<(Array2<f64>, Array2<f64>)> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model: StoredModel = serde_json::from_reader(reader)?;
        Ok((model.hidden_weights, model.output_weights))
    }
}
