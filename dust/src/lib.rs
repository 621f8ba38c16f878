pub mod block;
pub mod engine;

pub use block::redstone::PropagationStats;
pub use block::redstone::shape::WireShape;
pub use engine::{RedstoneEngine, StimulusEvent};
