//! Engine module - swap/resolve/cascade orchestration

pub mod resolve;

pub use resolve::{Activation, Phase, ResolutionEngine};
