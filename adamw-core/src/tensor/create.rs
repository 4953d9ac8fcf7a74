// src/tensor/create.rs

use crate::buffer::CpuBuffer;
use crate::error::CoreError;
use crate::tensor::Tensor;
use crate::types::DType;

/// Creates a new tensor of `dtype` filled with zeros with the specified shape.
pub fn zeros(shape: &[usize], dtype: DType) -> Result<Tensor, CoreError> {
    let numel = shape.iter().product();
    Tensor::from_buffer(CpuBuffer::zeros(dtype, numel), shape.to_vec())
}

/// Creates a new tensor of `dtype` filled with ones with the specified shape.
pub fn ones(shape: &[usize], dtype: DType) -> Result<Tensor, CoreError> {
    full(shape, 1.0, dtype)
}

/// Creates a new tensor filled with `value`, rounded to `dtype`.
pub fn full(shape: &[usize], value: f64, dtype: DType) -> Result<Tensor, CoreError> {
    let numel = shape.iter().product();
    Tensor::from_buffer(CpuBuffer::filled(dtype, numel, value), shape.to_vec())
}

/// Creates a zero tensor with the same shape and dtype as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, CoreError> {
    zeros(tensor.shape(), tensor.dtype())
}

/// Creates a zero tensor shaped like `tensor` but stored as `dtype`.
pub fn zeros_like_with_dtype(tensor: &Tensor, dtype: DType) -> Result<Tensor, CoreError> {
    zeros(tensor.shape(), dtype)
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
