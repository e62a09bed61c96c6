// Prints the shape of a saved text model.
//   cargo run -- model.txt
// Run the demos with:
//   cargo run --example xor
use std::process::ExitCode;

use ferrite_ann::Network;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        println!("usage: ferrite-ann <MODEL>");
        println!("Run `cargo run --example xor` to see the XOR demo.");
        return ExitCode::SUCCESS;
    };

    match Network::load_text(&path) {
        Ok(net) => {
            println!("inputs:        {}", net.inputs());
            println!("hidden layers: {}", net.hidden_layers());
            println!("hidden width:  {}", net.hidden());
            println!("outputs:       {}", net.outputs());
            println!("weights:       {}", net.total_weights());
            println!("neurons:       {}", net.total_neurons());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ferrite-ann: {path}: {e}");
            ExitCode::FAILURE
        }
    }
}
