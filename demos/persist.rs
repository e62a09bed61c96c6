use std::io::Cursor;

use ferrite_ann::{Activation, Network};

fn main() -> ferrite_ann::Result<()> {
    env_logger::init();

    let mut original = Network::new(4, 2, 6, 3)?;
    let sample = [0.2, -0.4, 0.9, 0.05];

    let mut text = Vec::new();
    original.write(&mut text)?;
    println!("text model: {} bytes", text.len());

    let mut restored = Network::read(&mut Cursor::new(text))?;
    let a = original.run(&sample).to_vec();
    let b = restored.run(&sample).to_vec();
    println!("original: {a:.6?}");
    println!("restored: {b:.6?}");

    // The text format drops activations; a JSON snapshot keeps them.
    original.set_activation_output(Activation::Linear);
    let mut from_json = Network::from_json_str(&original.to_json_string()?)?;
    let activation = from_json.activation_output();
    let c = from_json.run(&sample).to_vec();
    println!("json restored ({activation:?} output): {c:.6?}");
    Ok(())
}
