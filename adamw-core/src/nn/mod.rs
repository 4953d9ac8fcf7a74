//! Trainable parameters and the gradients attached to them.

pub mod parameter;

pub use parameter::{Gradient, ParamId, Parameter};
