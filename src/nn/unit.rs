//! Network Units
//!
//! A unit is a single node in the network graph: an input attribute, a bias
//! constant, a hidden neuron, or an output neuron. Hidden and output units
//! recompute their own output on demand and carry their own error term and
//! weight update during backpropagation.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Role of a unit within the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitRole {
    /// Holds one attribute value of the current example
    Input,
    /// Constant 1.0 feeding every hidden unit
    BiasToHidden,
    /// Hidden neuron with ReLU activation
    Hidden,
    /// Constant 1.0 feeding every output unit
    BiasToOutput,
    /// Output neuron; emits the linear pre-activation, softmax is applied
    /// across the whole output layer by the network
    Output,
}

/// Weighted edge from a unit in the upstream layer.
///
/// `source` indexes the upstream layer. The last connection of every hidden
/// and output unit is the bias edge: its source is the upstream bias unit,
/// whose output is always 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub source: usize,
    pub weight: f64,
}

/// A single neuron or bias node.
///
/// Input and bias units have no connections, so the delta and weight-update
/// operations degrade to no-ops for them; callers may sweep a whole layer
/// uniformly without branching on role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    role: UnitRole,
    connections: Vec<Connection>,
    input_value: f64,
    delta: f64,
}

impl Unit {
    /// Create a unit with no incoming connections.
    pub fn new(role: UnitRole) -> Self {
        Self {
            role,
            connections: Vec::new(),
            input_value: 0.0,
            delta: 0.0,
        }
    }

    pub fn role(&self) -> UnitRole {
        self.role
    }

    /// Incoming connections in upstream-layer order, bias edge last.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Append an incoming connection. The network wires hidden and output
    /// units in upstream order and adds the bias edge last.
    pub fn add_connection(&mut self, source: usize, weight: f64) {
        self.connections.push(Connection { source, weight });
    }

    /// Store the attribute value for an input unit. Ignored for every other
    /// role.
    pub fn set_input(&mut self, value: f64) {
        if self.role == UnitRole::Input {
            self.input_value = value;
        }
    }

    /// Backprop error term computed by the most recent `compute_delta` call.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Compute this unit's output from the upstream layer's outputs.
    ///
    /// Input units return the stored attribute, bias units the constant 1.0.
    /// Hidden and output units recompute the weighted sum from the current
    /// connection weights on every call: all connections except the last are
    /// multiplied with their source's output, then the trailing bias weight
    /// is added (its source output is always 1.0). Hidden units apply
    /// `max(0, x)`; output units return the raw pre-activation.
    pub fn output(&self, upstream: &[f64]) -> f64 {
        match self.role {
            UnitRole::Input => self.input_value,
            UnitRole::BiasToHidden | UnitRole::BiasToOutput => 1.0,
            UnitRole::Hidden => self.weighted_input(upstream).max(0.0),
            UnitRole::Output => self.weighted_input(upstream),
        }
    }

    fn weighted_input(&self, upstream: &[f64]) -> f64 {
        let Some((bias, rest)) = self.connections.split_last() else {
            return 0.0;
        };
        let sum: f64 = rest
            .iter()
            .map(|conn| conn.weight * upstream[conn.source])
            .sum();
        sum + bias.weight
    }

    /// Compute and store this unit's error term.
    ///
    /// For an output unit, `activation` is its softmax probability and the
    /// delta is `label[index] - activation`. For a hidden unit, `activation`
    /// is its own forward output; the delta is the ReLU gate (1 if the
    /// output was positive, else 0) times the sum over all output units `k`
    /// of `frozen_output_weights[k][index] * output_deltas[k]`. The frozen
    /// table must hold the output-layer weights as they were before any
    /// update in the current example. Input and bias units keep a delta of
    /// zero.
    pub fn compute_delta(
        &mut self,
        label: &Array1<f64>,
        activation: f64,
        output_deltas: &[f64],
        index: usize,
        frozen_output_weights: &Array2<f64>,
    ) -> f64 {
        match self.role {
            UnitRole::Output => {
                self.delta = label[index] - activation;
            }
            UnitRole::Hidden => {
                let gate = if activation > 0.0 { 1.0 } else { 0.0 };
                let sum: f64 = output_deltas
                    .iter()
                    .enumerate()
                    .map(|(k, d)| frozen_output_weights[[k, index]] * d)
                    .sum();
                self.delta = gate * sum;
            }
            _ => {}
        }
        self.delta
    }

    /// Apply one gradient step to every incoming connection:
    /// `w += learning_rate * source_output * delta`. The trailing bias edge
    /// is included; its source output is 1.0, so its weight moves by
    /// `learning_rate * delta`.
    pub fn update_weights(&mut self, learning_rate: f64, delta: f64, upstream: &[f64]) {
        for conn in &mut self.connections {
            conn.weight += learning_rate * upstream[conn.source] * delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    fn hidden_unit(weights: &[f64]) -> Unit {
        let mut unit = Unit::new(UnitRole::Hidden);
        for (j, &w) in weights.iter().enumerate() {
            unit.add_connection(j, w);
        }
        unit
    }

    #[test]
    fn test_bias_output_is_constant() {
        let mut unit = Unit::new(UnitRole::BiasToHidden);
        assert_eq!(unit.output(&[]), 1.0);
        unit.set_input(42.0);
        assert_eq!(unit.output(&[]), 1.0);
    }

    #[test]
    fn test_set_input_only_affects_input_units() {
        let mut input = Unit::new(UnitRole::Input);
        input.set_input(3.5);
        assert_eq!(input.output(&[]), 3.5);

        let mut hidden = hidden_unit(&[1.0, 0.0]);
        hidden.set_input(3.5);
        // Weighted sum of upstream [2.0] plus zero bias, unaffected by the call.
        assert_eq!(hidden.output(&[2.0]), 2.0);
    }

    #[test]
    fn test_weighted_sum_includes_trailing_bias() {
        let unit = hidden_unit(&[0.5, -0.25, 0.1]);
        // 0.5*2.0 - 0.25*4.0 + 0.1 = 0.1
        assert_relative_eq!(unit.output(&[2.0, 4.0, 1.0]), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_relu_gates_negative_preactivation() {
        let unit = hidden_unit(&[1.0, -2.0]);
        assert_eq!(unit.output(&[1.0, 1.0]), 0.0);

        // Output units pass the negative pre-activation through unchanged.
        let mut out = Unit::new(UnitRole::Output);
        out.add_connection(0, 1.0);
        out.add_connection(1, -2.0);
        assert_relative_eq!(out.output(&[1.0, 1.0]), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_output_delta_is_label_minus_activation() {
        let mut unit = Unit::new(UnitRole::Output);
        unit.add_connection(0, 0.0);
        unit.add_connection(1, 0.0);
        let frozen = arr2(&[[0.0, 0.0]]);
        let delta = unit.compute_delta(&arr1(&[1.0, 0.0]), 0.3, &[], 0, &frozen);
        assert_relative_eq!(delta, 0.7, epsilon = 1e-12);
        assert_relative_eq!(unit.delta(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_hidden_delta_gated_to_zero_when_inactive() {
        let mut unit = hidden_unit(&[1.0, 0.0]);
        let frozen = arr2(&[[5.0, 0.0], [5.0, 0.0]]);
        let delta = unit.compute_delta(&arr1(&[1.0, 0.0]), 0.0, &[1.0, 1.0], 0, &frozen);
        assert_eq!(delta, 0.0);
    }

    #[test]
    fn test_hidden_delta_sums_frozen_weights() {
        let mut unit = hidden_unit(&[1.0, 0.0]);
        let frozen = arr2(&[[0.5, 0.0], [-0.5, 0.0]]);
        let delta = unit.compute_delta(&arr1(&[1.0, 0.0]), 2.0, &[0.4, -0.4], 0, &frozen);
        // 1 * (0.5*0.4 + (-0.5)*(-0.4)) = 0.4
        assert_relative_eq!(delta, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_update_moves_weights_with_source_sign() {
        let mut unit = hidden_unit(&[1.0, -1.0, 0.0]);
        unit.update_weights(0.1, 0.5, &[2.0, -3.0, 1.0]);
        let weights: Vec<f64> = unit.connections().iter().map(|c| c.weight).collect();
        assert_relative_eq!(weights[0], 1.1, epsilon = 1e-12);
        assert_relative_eq!(weights[1], -1.15, epsilon = 1e-12);
        // Bias edge moves by learning_rate * delta.
        assert_relative_eq!(weights[2], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_and_update_are_noops_for_bias_and_input() {
        let frozen = arr2(&[[1.0]]);
        for role in [UnitRole::Input, UnitRole::BiasToHidden, UnitRole::BiasToOutput] {
            let mut unit = Unit::new(role);
            let delta = unit.compute_delta(&arr1(&[1.0]), 0.5, &[1.0], 0, &frozen);
            assert_eq!(delta, 0.0);
            unit.update_weights(0.1, 1.0, &[1.0]);
            assert!(unit.connections().is_empty());
        }
    }
}
