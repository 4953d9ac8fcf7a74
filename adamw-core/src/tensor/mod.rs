// src/tensor/mod.rs

use half::{bf16, f16};

use crate::buffer::CpuBuffer;
use crate::element::ComputeElement;
use crate::error::CoreError;
use crate::tensor_data::TensorData;
use crate::types::DType;

pub mod create;
pub mod sparse;

pub use create::{full, ones, zeros, zeros_like};
pub use sparse::SparseTensor;

/// A dense, row-major, CPU-resident multi-dimensional array.
///
/// A `Tensor` owns its buffer outright. Cloning copies the data, and
/// in-place mutation requires `&mut Tensor`, so whoever holds the mutable
/// borrow has exclusive access for its duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: TensorData,
}

impl Tensor {
    /// Creates a new Tensor with the given f32 data and shape.
    ///
    /// This is the primary constructor for creating tensors from raw data.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, CoreError> {
        Self::from_buffer(CpuBuffer::F32(data_vec), shape)
    }

    /// Creates a new F64 Tensor.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, CoreError> {
        Self::from_buffer(CpuBuffer::F64(data_vec), shape)
    }

    /// Creates a new F16 Tensor.
    pub fn new_f16(data_vec: Vec<f16>, shape: Vec<usize>) -> Result<Self, CoreError> {
        Self::from_buffer(CpuBuffer::F16(data_vec), shape)
    }

    /// Creates a new BF16 Tensor.
    pub fn new_bf16(data_vec: Vec<bf16>, shape: Vec<usize>) -> Result<Self, CoreError> {
        Self::from_buffer(CpuBuffer::BF16(data_vec), shape)
    }

    /// Wraps an existing buffer.
    pub fn from_buffer(buffer: CpuBuffer, shape: Vec<usize>) -> Result<Self, CoreError> {
        Ok(Tensor {
            data: TensorData::new(buffer, shape)?,
        })
    }

    /// Returns the storage data type of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.data.shape
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.data.numel()
    }

    /// Returns a copy of the data if the tensor is stored as F32.
    ///
    /// # Errors
    /// `CoreError::DataTypeMismatch` for any other storage type. Use
    /// [`Tensor::to_f32_vec`] for a converting read.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, CoreError> {
        f32::slice(&self.data.buffer)
            .map(|s| s.to_vec())
            .ok_or_else(|| self.dtype_mismatch(DType::F32, "get_f32_data"))
    }

    /// Returns a copy of the data if the tensor is stored as F64.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, CoreError> {
        f64::slice(&self.data.buffer)
            .map(|s| s.to_vec())
            .ok_or_else(|| self.dtype_mismatch(DType::F64, "get_f64_data"))
    }

    /// Copies the data out as f32 regardless of storage type.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.data.buffer.to_f32_vec()
    }

    /// Copies the data out as f64 regardless of storage type.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data.buffer.to_f64_vec()
    }

    /// Copies the data out in the compute type `F`.
    pub fn to_vec<F: ComputeElement>(&self) -> Vec<F> {
        F::read(&self.data.buffer)
    }

    /// Returns a new tensor with the same shape converted to `dtype`.
    ///
    /// `self` is left untouched, even when `dtype` already matches.
    pub fn cast(&self, dtype: DType) -> Tensor {
        Tensor {
            data: TensorData {
                buffer: self.data.buffer.cast(dtype),
                shape: self.data.shape.clone(),
            },
        }
    }

    /// Mutably borrows the elements as `F` when the storage type is exactly `F`.
    pub fn as_mut_slice<F: ComputeElement>(&mut self) -> Result<&mut [F], CoreError> {
        let actual = self.dtype();
        F::slice_mut(&mut self.data.buffer).ok_or(CoreError::DataTypeMismatch {
            expected: F::DTYPE,
            actual,
            operation: "as_mut_slice".to_string(),
        })
    }

    /// Overwrites the tensor contents in place from `values`, rounding into
    /// the storage type. Shape and dtype are unchanged.
    pub fn assign<F: ComputeElement>(&mut self, values: &[F]) -> Result<(), CoreError> {
        F::write(&mut self.data.buffer, values)
    }

    /// Fills every element with zero, keeping shape and dtype.
    pub fn fill_zero(&mut self) {
        self.data.buffer = CpuBuffer::zeros(self.dtype(), self.numel());
    }

    /// Elementwise in-place addition `self += other` (shapes must match).
    ///
    /// The sum is formed in `self`'s compute precision and rounded back.
    pub fn add_assign(&mut self, other: &Tensor) -> Result<(), CoreError> {
        self.check_same_shape(other.shape(), "add_assign")?;
        match self.dtype().compute_dtype() {
            DType::F64 => self.add_assign_as::<f64>(other),
            _ => self.add_assign_as::<f32>(other),
        }
    }

    fn add_assign_as<F: ComputeElement>(&mut self, other: &Tensor) -> Result<(), CoreError> {
        let rhs: Vec<F> = other.to_vec();
        let mut lhs: Vec<F> = self.to_vec();
        lhs.iter_mut().zip(rhs).for_each(|(a, b)| *a = *a + b);
        self.assign(&lhs)
    }

    /// Errors with `ShapeMismatch` unless `shape` equals this tensor's shape.
    pub fn check_same_shape(&self, shape: &[usize], operation: &str) -> Result<(), CoreError> {
        if self.shape() != shape {
            return Err(CoreError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: shape.to_vec(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn dtype_mismatch(&self, expected: DType, operation: &str) -> CoreError {
        CoreError::DataTypeMismatch {
            expected,
            actual: self.dtype(),
            operation: operation.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
