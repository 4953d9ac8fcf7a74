//! Numeric substrate for the AdamW optimizer: owned CPU tensors in
//! half/single/double precision, COO sparse tensors, and caller-owned
//! trainable parameters with stable identities.

pub mod buffer;
pub mod element;
pub mod error;
pub mod nn;
pub mod tensor;
pub mod tensor_data;
pub mod types;

pub use element::ComputeElement;
pub use error::CoreError;
pub use nn::{Gradient, ParamId, Parameter};
pub use tensor::{SparseTensor, Tensor};
pub use types::DType;

// Re-export so downstream crates name the same `f16`/`bf16` types.
pub use half;
