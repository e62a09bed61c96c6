use serde::{Serialize, Deserialize};

use super::lookup::sigmoid_cached;

/// Activation applied to a neuron's weighted sum.
///
/// Selected per network and per role (hidden layers vs. output layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `1 / (1 + e^-x)`, computed directly.
    Sigmoid,
    /// Sigmoid read from a shared lookup table; faster, slightly less exact.
    #[default]
    SigmoidCached,
    /// `1` for `x > 0`, else `0`.
    Threshold,
    /// Identity.
    Linear,
}

impl Activation {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::SigmoidCached => sigmoid_cached(x),
            Activation::Threshold => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::Linear => x,
        }
    }

    /// Derivative expressed in terms of the activation's output `y`,
    /// which is what backpropagation has at hand.
    ///
    /// Threshold has no useful derivative; it is treated like `Linear`.
    /// This is an approximation and changes nothing about the forward pass.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid | Activation::SigmoidCached => y * (1.0 - y),
            Activation::Threshold | Activation::Linear => 1.0,
        }
    }
}

/// Logistic sigmoid, saturated beyond |x| > 45 where `exp` stops mattering.
pub fn sigmoid(x: f64) -> f64 {
    if x < -45.0 {
        0.0
    } else if x > 45.0 {
        1.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_values() {
        assert_eq!(Activation::Linear.function(-2.5), -2.5);
        assert_eq!(Activation::Threshold.function(0.0), 0.0);
        assert_eq!(Activation::Threshold.function(1e-9), 1.0);
        assert_eq!(Activation::Sigmoid.function(0.0), 0.5);
        assert_eq!(Activation::Sigmoid.function(-50.0), 0.0);
        assert_eq!(Activation::Sigmoid.function(50.0), 1.0);
    }

    #[test]
    fn cached_tracks_direct() {
        for &x in &[-3.0, -0.7, 0.0, 0.25, 4.0] {
            let d = Activation::Sigmoid.function(x);
            let c = Activation::SigmoidCached.function(x);
            assert!((d - c).abs() < 2e-3);
        }
    }

    #[test]
    fn derivatives() {
        assert_eq!(Activation::Sigmoid.derivative_from_output(0.5), 0.25);
        assert_eq!(Activation::SigmoidCached.derivative_from_output(0.5), 0.25);
        assert_eq!(Activation::Linear.derivative_from_output(7.0), 1.0);
        assert_eq!(Activation::Threshold.derivative_from_output(0.0), 1.0);
    }

    #[test]
    fn default_is_cached_sigmoid() {
        assert_eq!(Activation::default(), Activation::SigmoidCached);
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&Activation::SigmoidCached).unwrap();
        assert_eq!(json, "\"sigmoid_cached\"");
        let back: Activation = serde_json::from_str("\"threshold\"").unwrap();
        assert_eq!(back, Activation::Threshold);
    }
}
