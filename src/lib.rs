pub mod error;
pub mod activation;
pub mod network;

// Convenience re-exports
pub use error::{AnnError, Result};
pub use activation::{Activation, init_sigmoid_lookup};
pub use network::{Network, Shape};
