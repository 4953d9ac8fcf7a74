// src/tensor_data.rs
use crate::buffer::CpuBuffer;
use crate::error::CoreError;
use crate::types::DType;

/// Internal storage and metadata for a Tensor.
///
/// Tensors handled by the optimizer are always row-major contiguous, so a
/// buffer and a shape are all there is.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    /// The underlying typed data buffer.
    pub(crate) buffer: CpuBuffer,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
}

impl TensorData {
    /// Wraps `buffer` with `shape`, checking that the element counts agree.
    ///
    /// # Errors
    /// Returns `CoreError::TensorCreationError` if the buffer length does not
    /// match the number of elements implied by `shape`.
    pub fn new(buffer: CpuBuffer, shape: Vec<usize>) -> Result<Self, CoreError> {
        let numel: usize = shape.iter().product();
        let data_len = buffer.len();
        if data_len != numel {
            return Err(CoreError::TensorCreationError { data_len, shape });
        }
        Ok(TensorData { buffer, shape })
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }
}
