use ferrite_ann::{Network, Shape};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() -> ferrite_ann::Result<()> {
    env_logger::init();

    let mut rng = ChaCha8Rng::seed_from_u64(2018);
    let mut network = Network::with_rng(Shape::new(2, 1, 2, 1)?, &mut rng)?;

    let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let expected_outputs = [[0.0], [1.0], [1.0], [0.0]];

    // Plain online backprop can stall in a local minimum; retry from fresh
    // weights until every sample is on the right side of 0.5.
    let mut attempts = 0;
    loop {
        attempts += 1;
        for _ in 0..5000 {
            for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
                network.train(input, expected, 3.0);
            }
        }
        let solved = inputs.iter().zip(expected_outputs.iter())
            .all(|(input, expected)| (network.run(input)[0] - expected[0]).abs() < 0.5);
        if solved || attempts == 10 {
            break;
        }
        info!("attempt {attempts} did not converge, re-randomizing");
        network.randomize_with(&mut rng);
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.run(input)[0]);
    }
    Ok(())
}
