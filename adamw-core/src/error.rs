use crate::types::DType;
use thiserror::Error;

/// Custom error type for the tensor and parameter layer.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum CoreError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Data type mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Sparse index {index} out of bounds for tensor with {numel} elements")]
    SparseIndexOutOfBounds { index: usize, numel: usize },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}
