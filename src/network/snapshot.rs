//! JSON snapshots: shape, both activation selectors and the weights.
//!
//! Unlike the text format, a snapshot restores the activations too. The
//! output and delta buffers are scratch state and are not stored.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::{Serialize, Deserialize};

use crate::activation::Activation;
use crate::error::{AnnError, Result};
use crate::network::network::Network;
use crate::network::shape::Shape;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    shape: Shape,
    activation_hidden: Activation,
    activation_output: Activation,
    weights: &'a [f64],
}

#[derive(Deserialize)]
struct Snapshot {
    shape: Shape,
    activation_hidden: Activation,
    activation_output: Activation,
    weights: Vec<f64>,
}

impl Network {
    fn snapshot(&self) -> SnapshotRef<'_> {
        SnapshotRef {
            shape: self.shape(),
            activation_hidden: self.activation_hidden(),
            activation_output: self.activation_output(),
            weights: self.weights(),
        }
    }

    fn from_snapshot(snap: Snapshot) -> Result<Network> {
        let s = snap.shape;
        let shape = Shape::new(s.inputs, s.hidden_layers, s.hidden, s.outputs)?;
        let expected = shape.total_weights();
        if snap.weights.len() != expected {
            return Err(AnnError::Snapshot(format!(
                "shape needs {expected} weights, found {}",
                snap.weights.len()
            )));
        }
        Network::from_parts(shape, snap.activation_hidden, snap.activation_output, snap.weights)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json_str(json: &str) -> Result<Network> {
        Network::from_snapshot(serde_json::from_str(json)?)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, &self.snapshot())?;
        writer.flush()?;
        debug!("saved json snapshot to {}", path.as_ref().display());
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let net = Network::from_snapshot(serde_json::from_reader(reader)?)?;
        debug!("loaded json snapshot from {}", path.as_ref().display());
        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn keeps_activations() {
        let shape = Shape::new(2, 2, 3, 1).unwrap();
        let mut net = Network::with_rng(shape, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        net.set_activation_hidden(Activation::Linear);
        net.set_activation_output(Activation::Threshold);

        let back = Network::from_json_str(&net.to_json_string().unwrap()).unwrap();
        assert_eq!(back.shape(), shape);
        assert_eq!(back.activation_hidden(), Activation::Linear);
        assert_eq!(back.activation_output(), Activation::Threshold);
        for (a, b) in back.weights().iter().zip(net.weights()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_wrong_weight_count() {
        let json = r#"{
            "shape": { "inputs": 1, "hidden_layers": 0, "hidden": 0, "outputs": 1 },
            "activation_hidden": "sigmoid",
            "activation_output": "linear",
            "weights": [0.1]
        }"#;
        assert!(matches!(Network::from_json_str(json), Err(AnnError::Snapshot(_))));
    }

    #[test]
    fn rejects_invalid_shape() {
        let json = r#"{
            "shape": { "inputs": 0, "hidden_layers": 0, "hidden": 0, "outputs": 1 },
            "activation_hidden": "sigmoid",
            "activation_output": "sigmoid",
            "weights": [0.1]
        }"#;
        assert!(matches!(Network::from_json_str(json), Err(AnnError::InvalidShape { .. })));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(Network::from_json_str("{ not json"), Err(AnnError::Json(_))));
    }
}
