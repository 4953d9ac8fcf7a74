use std::fmt::Debug;

use num_traits::Float;

use crate::buffer::CpuBuffer;
use crate::error::CoreError;
use crate::types::DType;

/// A floating-point type arithmetic can be carried out in.
///
/// Implemented for `f32` and `f64`, the two possible results of
/// [`DType::compute_dtype`]. Lets numeric kernels be written once,
/// generically, and read or write any storage type through widening and
/// rounding copies.
pub trait ComputeElement: Float + Debug + Send + Sync + 'static {
    /// The storage type matching `Self`.
    const DTYPE: DType;

    /// Converts an `f64` hyperparameter into `Self`.
    fn from_f64(value: f64) -> Self;

    /// Borrows the buffer's elements if it is stored as `Self`.
    fn slice(buffer: &CpuBuffer) -> Option<&[Self]>;

    /// Mutably borrows the buffer's elements if it is stored as `Self`.
    fn slice_mut(buffer: &mut CpuBuffer) -> Option<&mut [Self]>;

    /// Copies a buffer of any storage type out as `Self`.
    fn read(buffer: &CpuBuffer) -> Vec<Self>;

    /// Writes `values` into a buffer of any storage type, rounding if the
    /// buffer is narrower than `Self`.
    fn write(buffer: &mut CpuBuffer, values: &[Self]) -> Result<(), CoreError>;
}

impl ComputeElement for f32 {
    const DTYPE: DType = DType::F32;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn slice(buffer: &CpuBuffer) -> Option<&[Self]> {
        match buffer {
            CpuBuffer::F32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn slice_mut(buffer: &mut CpuBuffer) -> Option<&mut [Self]> {
        match buffer {
            CpuBuffer::F32(v) => Some(v.as_mut_slice()),
            _ => None,
        }
    }

    fn read(buffer: &CpuBuffer) -> Vec<Self> {
        buffer.to_f32_vec()
    }

    fn write(buffer: &mut CpuBuffer, values: &[Self]) -> Result<(), CoreError> {
        buffer.assign_from_f32(values)
    }
}

impl ComputeElement for f64 {
    const DTYPE: DType = DType::F64;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn slice(buffer: &CpuBuffer) -> Option<&[Self]> {
        match buffer {
            CpuBuffer::F64(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn slice_mut(buffer: &mut CpuBuffer) -> Option<&mut [Self]> {
        match buffer {
            CpuBuffer::F64(v) => Some(v.as_mut_slice()),
            _ => None,
        }
    }

    fn read(buffer: &CpuBuffer) -> Vec<Self> {
        buffer.to_f64_vec()
    }

    fn write(buffer: &mut CpuBuffer, values: &[Self]) -> Result<(), CoreError> {
        buffer.assign_from_f64(values)
    }
}
