//! Plain-text model format.
//!
//! A model is the four shape fields `inputs hidden_layers hidden outputs`
//! followed by every weight in layout order, all separated by whitespace.
//! Weights are printed in shortest round-trip exponent form, so reading a
//! written model restores the exact bits. Activations are not stored: a
//! loaded network always starts with the default activations.
//!
//! A reader consumes exactly one model, so several can share one stream.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::activation::Activation;
use crate::error::{AnnError, Result};
use crate::network::network::Network;
use crate::network::shape::Shape;

impl Network {
    /// Writes the shape header and every weight to `out`.
    pub fn write<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        let s = self.shape();
        write!(out, "{} {} {} {}", s.inputs, s.hidden_layers, s.hidden, s.outputs)?;
        for w in self.weights() {
            write!(out, " {w:e}")?;
        }
        writeln!(out)?;
        debug!("wrote network with {} weights", self.total_weights());
        Ok(())
    }

    /// Reads one model written by [`Network::write`].
    ///
    /// Fails with [`AnnError::Parse`] on a malformed or truncated model;
    /// no network is returned in that case.
    pub fn read<R: BufRead + ?Sized>(input: &mut R) -> Result<Network> {
        let inputs = parse_field::<usize, R>(input, "inputs")?;
        let hidden_layers = parse_field::<usize, R>(input, "hidden_layers")?;
        let hidden = parse_field::<usize, R>(input, "hidden")?;
        let outputs = parse_field::<usize, R>(input, "outputs")?;

        let shape = Shape::new(inputs, hidden_layers, hidden, outputs).map_err(|_| AnnError::Parse {
            what: "a valid shape header".into(),
            found: format!("{inputs} {hidden_layers} {hidden} {outputs}"),
        })?;

        // Grow with the stream rather than trusting the header's size.
        let mut weights = Vec::new();
        for i in 0..shape.total_weights() {
            weights.push(parse_field::<f64, R>(input, &format!("weight {i}"))?);
        }
        let net = Network::from_parts(shape, Activation::default(), Activation::default(), weights)?;
        debug!("read network with {} weights", net.total_weights());
        Ok(net)
    }

    /// Writes the model to a file at `path`.
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut writer)?;
        writer.flush()?;
        debug!("saved text model to {}", path.as_ref().display());
        Ok(())
    }

    /// Reads a model from a file written by [`Network::save_text`].
    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Network> {
        let mut reader = BufReader::new(File::open(path.as_ref())?);
        Network::read(&mut reader)
    }
}

fn parse_field<T: std::str::FromStr, R: BufRead + ?Sized>(input: &mut R, what: &str) -> Result<T> {
    let parse_err = |found: String| AnnError::Parse { what: what.to_string(), found };
    let token = next_token(input)?.ok_or_else(|| parse_err("end of input".into()))?;
    token.parse::<T>().map_err(|_| parse_err(token))
}

/// Next whitespace-delimited token, consuming the delimiter after it.
/// `None` at end of input.
fn next_token<R: BufRead + ?Sized>(input: &mut R) -> Result<Option<String>> {
    let mut token = Vec::new();
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let mut used = 0;
        let mut complete = false;
        for &b in buf {
            used += 1;
            if b.is_ascii_whitespace() {
                if token.is_empty() {
                    continue;
                }
                complete = true;
                break;
            }
            token.push(b);
        }
        input.consume(used);
        if complete {
            break;
        }
    }
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&token).into_owned()))
}
