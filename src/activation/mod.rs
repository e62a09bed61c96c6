pub mod activation;
pub mod lookup;

pub use activation::Activation;
pub use lookup::init_sigmoid_lookup;
