pub mod network;
pub mod shape;
pub mod snapshot;
pub mod text;

pub use network::Network;
pub use shape::Shape;
