use serde::{Serialize, Deserialize};

use crate::error::{AnnError, Result};

/// Dimensions of a network: raw inputs, `hidden_layers` hidden layers of
/// `hidden` neurons each, and `outputs` output neurons.
///
/// Layers are numbered from the first non-input layer: layer `0` is the
/// first hidden layer (or the output layer when there are no hidden
/// layers) and layer `hidden_layers` is always the output layer.
///
/// Buffer layout derived from a shape:
/// - weights: layer by layer; inside a layer, for each neuron, the bias
///   weight followed by one weight per source neuron of the previous layer.
/// - neuron outputs: the raw inputs, then each layer's outputs in order.
/// - deltas: the neuron-output layout without the input slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub inputs: usize,
    pub hidden_layers: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Shape {
    /// Validates the dimensions. `hidden` is normalized to `0` when there
    /// are no hidden layers, since it does not take part in the layout.
    pub fn new(inputs: usize, hidden_layers: usize, hidden: usize, outputs: usize) -> Result<Shape> {
        Shape { inputs, hidden_layers, hidden, outputs }.validate()
    }

    /// Checks the layout constraints and that the derived totals fit in
    /// `usize`, returning the normalized shape (`hidden = 0` without
    /// hidden layers).
    pub fn validate(&self) -> Result<Shape> {
        let shape = Shape {
            hidden: if self.hidden_layers == 0 { 0 } else { self.hidden },
            ..*self
        };
        let bad_dims = shape.inputs == 0
            || shape.outputs == 0
            || (shape.hidden_layers > 0 && shape.hidden == 0);
        if bad_dims || shape.checked_totals().is_none() {
            return Err(AnnError::InvalidShape {
                inputs: self.inputs,
                hidden_layers: self.hidden_layers,
                hidden: self.hidden,
                outputs: self.outputs,
            });
        }
        Ok(shape)
    }

    fn checked_totals(&self) -> Option<(usize, usize)> {
        let (i, h, o) = (self.inputs, self.hidden, self.outputs);
        let weights = if self.hidden_layers > 0 {
            let first = i.checked_add(1)?.checked_mul(h)?;
            let inner = (self.hidden_layers - 1)
                .checked_mul(h.checked_add(1)?)?
                .checked_mul(h)?;
            let last = h.checked_add(1)?.checked_mul(o)?;
            first.checked_add(inner)?.checked_add(last)?
        } else {
            i.checked_add(1)?.checked_mul(o)?
        };
        let neurons = self.hidden_layers
            .checked_mul(h)?
            .checked_add(i)?
            .checked_add(o)?;
        Some((weights, neurons))
    }

    fn totals(&self) -> (usize, usize) {
        match self.checked_totals() {
            Some(totals) => totals,
            None => panic!("shape totals overflow usize: {self:?}"),
        }
    }

    /// Number of connection weights, bias weights included.
    ///
    /// # Panics
    /// Panics if the count overflows `usize`; shapes from [`Shape::new`] or
    /// [`Shape::validate`] never do.
    pub fn total_weights(&self) -> usize {
        self.totals().0
    }

    /// Inputs plus every hidden and output neuron.
    ///
    /// # Panics
    /// Same as [`Shape::total_weights`].
    pub fn total_neurons(&self) -> usize {
        self.totals().1
    }

    /// Length of the delta buffer: every non-input neuron.
    pub fn total_deltas(&self) -> usize {
        self.total_neurons() - self.inputs
    }

    /// Number of non-input layers.
    pub fn layer_count(&self) -> usize {
        self.hidden_layers + 1
    }

    pub fn layer_width(&self, layer: usize) -> usize {
        if layer < self.hidden_layers { self.hidden } else { self.outputs }
    }

    /// Sources feeding each neuron of `layer`, bias excluded.
    pub fn layer_fan_in(&self, layer: usize) -> usize {
        if layer == 0 { self.inputs } else { self.hidden }
    }

    /// Weights per neuron of `layer`: bias plus fan-in.
    pub fn stride(&self, layer: usize) -> usize {
        self.layer_fan_in(layer) + 1
    }

    /// Index of the first weight of `layer`.
    pub fn weight_offset(&self, layer: usize) -> usize {
        if layer == 0 {
            0
        } else {
            (self.inputs + 1) * self.hidden + (layer - 1) * (self.hidden + 1) * self.hidden
        }
    }

    /// Index of `layer`'s first neuron in the neuron-output buffer.
    pub fn neuron_offset(&self, layer: usize) -> usize {
        self.inputs + layer * self.hidden
    }

    /// Index of the first source value feeding `layer`.
    pub fn source_offset(&self, layer: usize) -> usize {
        if layer == 0 { 0 } else { self.neuron_offset(layer - 1) }
    }

    /// Index of `layer`'s first neuron in the delta buffer.
    pub fn delta_offset(&self, layer: usize) -> usize {
        layer * self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_match_closed_form() {
        for i in 1..5 {
            for hl in 0..4 {
                for h in 1..5 {
                    for o in 1..4 {
                        let s = Shape::new(i, hl, h, o).unwrap();
                        let expected_w = if hl > 0 {
                            (i + 1) * h + (hl - 1) * (h + 1) * h + (h + 1) * o
                        } else {
                            (i + 1) * o
                        };
                        assert_eq!(s.total_weights(), expected_w);
                        assert_eq!(s.total_neurons(), i + hl * s.hidden + o);
                    }
                }
            }
        }
    }

    #[test]
    fn concrete_two_one_two_one() {
        let s = Shape::new(2, 1, 2, 1).unwrap();
        assert_eq!(s.total_weights(), 9);
        assert_eq!(s.total_neurons(), 5);
        assert_eq!(s.total_deltas(), 3);
    }

    #[test]
    fn rejects_invalid_dimensions() {
        assert!(matches!(Shape::new(0, 1, 2, 1), Err(AnnError::InvalidShape { .. })));
        assert!(matches!(Shape::new(2, 1, 2, 0), Err(AnnError::InvalidShape { .. })));
        assert!(matches!(Shape::new(2, 3, 0, 1), Err(AnnError::InvalidShape { .. })));
        assert!(matches!(Shape::new(usize::MAX, 1, 2, 1), Err(AnnError::InvalidShape { .. })));
    }

    #[test]
    fn validate_normalizes_struct_literals() {
        let literal = Shape { inputs: 1, hidden_layers: 0, hidden: 5, outputs: 1 };
        let shape = literal.validate().unwrap();
        assert_eq!(shape, Shape::new(1, 0, 0, 1).unwrap());
        assert_eq!(shape.hidden, 0);
    }

    #[test]
    #[should_panic(expected = "shape totals overflow usize")]
    fn totals_of_an_overflowing_literal_panic() {
        let literal = Shape { inputs: usize::MAX, hidden_layers: 0, hidden: 0, outputs: 2 };
        literal.total_weights();
    }

    #[test]
    fn hidden_width_ignored_without_hidden_layers() {
        let s = Shape::new(3, 0, 9, 2).unwrap();
        assert_eq!(s.hidden, 0);
        assert_eq!(s.total_weights(), 8);
        assert_eq!(s.layer_count(), 1);
        assert_eq!(s.layer_fan_in(0), 3);
        assert_eq!(s.layer_width(0), 2);
    }

    #[test]
    fn offsets_tile_the_buffers() {
        let s = Shape::new(3, 2, 4, 2).unwrap();
        let mut w = 0;
        let mut n = s.inputs;
        for l in 0..s.layer_count() {
            assert_eq!(s.weight_offset(l), w);
            assert_eq!(s.neuron_offset(l), n);
            assert_eq!(s.delta_offset(l), n - s.inputs);
            w += s.layer_width(l) * s.stride(l);
            n += s.layer_width(l);
        }
        assert_eq!(w, s.total_weights());
        assert_eq!(n, s.total_neurons());
        assert_eq!(s.source_offset(0), 0);
        assert_eq!(s.source_offset(2), s.neuron_offset(1));
    }
}
