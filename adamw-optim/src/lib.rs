//! # adamw-optim
//!
//! AdamW: Adam with decoupled weight decay.
//!
//! The optimizer keeps per-parameter first and second moment estimates in a
//! [`StateStore`] keyed by [`ParamId`](adamw_core::ParamId), created lazily on
//! the first step a parameter has a gradient. Parameters stay owned by the
//! caller and are lent to each step:
//!
//! 1. gradients are attached to the caller's [`Parameter`](adamw_core::Parameter)s
//! 2. `optimizer.step(&mut params)` updates them in place
//! 3. `optimizer.zero_grad(&mut params)` before the next gradient pass
//!
//! `step_with` takes a closure that recomputes gradients (and returns the
//! loss) before the update is applied.

pub mod adamw;
pub mod config;
pub mod error;
mod kernel;
pub mod optimizer_state;
pub mod optimizer_trait;
pub mod param_group;
pub mod state;

pub use adamw::AdamW;
pub use config::AdamWConfig;
pub use error::OptimError;
pub use optimizer_state::OptimizerState;
pub use optimizer_trait::Optimizer;
pub use param_group::{ParamGroup, ParamGroupOptions};
pub use state::{MomentState, StateStore};
