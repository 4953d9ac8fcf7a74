use half::{bf16, f16};

use crate::error::CoreError;
use crate::types::DType;

/// Typed CPU storage backing a tensor.
///
/// The buffer is owned by exactly one `TensorData`; cloning it copies the
/// elements.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuBuffer {
    F16(Vec<f16>),
    BF16(Vec<bf16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl CpuBuffer {
    /// Allocates a zero-filled buffer of `len` elements of type `dtype`.
    pub fn zeros(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::F16 => CpuBuffer::F16(vec![f16::ZERO; len]),
            DType::BF16 => CpuBuffer::BF16(vec![bf16::ZERO; len]),
            DType::F32 => CpuBuffer::F32(vec![0.0; len]),
            DType::F64 => CpuBuffer::F64(vec![0.0; len]),
        }
    }

    /// Allocates a buffer of `len` copies of `value`, rounded to `dtype`.
    pub fn filled(dtype: DType, len: usize, value: f64) -> Self {
        match dtype {
            DType::F16 => CpuBuffer::F16(vec![f16::from_f64(value); len]),
            DType::BF16 => CpuBuffer::BF16(vec![bf16::from_f64(value); len]),
            DType::F32 => CpuBuffer::F32(vec![value as f32; len]),
            DType::F64 => CpuBuffer::F64(vec![value; len]),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            CpuBuffer::F16(_) => DType::F16,
            CpuBuffer::BF16(_) => DType::BF16,
            CpuBuffer::F32(_) => DType::F32,
            CpuBuffer::F64(_) => DType::F64,
        }
    }

    /// Returns the number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            CpuBuffer::F16(v) => v.len(),
            CpuBuffer::BF16(v) => v.len(),
            CpuBuffer::F32(v) => v.len(),
            CpuBuffer::F64(v) => v.len(),
        }
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements out as `f32`, widening or rounding as needed.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            CpuBuffer::F16(v) => v.iter().map(|x| x.to_f32()).collect(),
            CpuBuffer::BF16(v) => v.iter().map(|x| x.to_f32()).collect(),
            CpuBuffer::F32(v) => v.clone(),
            CpuBuffer::F64(v) => v.iter().map(|&x| x as f32).collect(),
        }
    }

    /// Copies the elements out as `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            CpuBuffer::F16(v) => v.iter().map(|x| x.to_f64()).collect(),
            CpuBuffer::BF16(v) => v.iter().map(|x| x.to_f64()).collect(),
            CpuBuffer::F32(v) => v.iter().map(|&x| x as f64).collect(),
            CpuBuffer::F64(v) => v.clone(),
        }
    }

    /// Returns a copy of this buffer converted to `dtype`.
    pub fn cast(&self, dtype: DType) -> CpuBuffer {
        if self.dtype() == dtype {
            return self.clone();
        }
        match dtype {
            DType::F16 => CpuBuffer::F16(self.to_f64_vec().into_iter().map(f16::from_f64).collect()),
            DType::BF16 => {
                CpuBuffer::BF16(self.to_f64_vec().into_iter().map(bf16::from_f64).collect())
            }
            DType::F32 => CpuBuffer::F32(self.to_f32_vec()),
            DType::F64 => CpuBuffer::F64(self.to_f64_vec()),
        }
    }

    /// Overwrites every element from an `f32` slice, rounding into the
    /// buffer's own storage type.
    pub fn assign_from_f32(&mut self, values: &[f32]) -> Result<(), CoreError> {
        self.check_assign_len(values.len())?;
        match self {
            CpuBuffer::F16(v) => v.iter_mut().zip(values).for_each(|(d, &s)| *d = f16::from_f32(s)),
            CpuBuffer::BF16(v) => {
                v.iter_mut().zip(values).for_each(|(d, &s)| *d = bf16::from_f32(s))
            }
            CpuBuffer::F32(v) => v.copy_from_slice(values),
            CpuBuffer::F64(v) => v.iter_mut().zip(values).for_each(|(d, &s)| *d = s as f64),
        }
        Ok(())
    }

    /// Overwrites every element from an `f64` slice.
    pub fn assign_from_f64(&mut self, values: &[f64]) -> Result<(), CoreError> {
        self.check_assign_len(values.len())?;
        match self {
            CpuBuffer::F16(v) => v.iter_mut().zip(values).for_each(|(d, &s)| *d = f16::from_f64(s)),
            CpuBuffer::BF16(v) => {
                v.iter_mut().zip(values).for_each(|(d, &s)| *d = bf16::from_f64(s))
            }
            CpuBuffer::F32(v) => v.iter_mut().zip(values).for_each(|(d, &s)| *d = s as f32),
            CpuBuffer::F64(v) => v.copy_from_slice(values),
        }
        Ok(())
    }

    fn check_assign_len(&self, len: usize) -> Result<(), CoreError> {
        if len != self.len() {
            return Err(CoreError::ShapeMismatch {
                expected: vec![self.len()],
                actual: vec![len],
                operation: "buffer assign".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_rounds_through_half() {
        let buf = CpuBuffer::F32(vec![1.0, 0.1, -2.5]);
        let half = buf.cast(DType::F16);
        assert_eq!(half.dtype(), DType::F16);
        let back = half.to_f32_vec();
        assert_eq!(back[0], 1.0);
        assert_eq!(back[2], -2.5);
        // 0.1 is not representable in f16
        assert!((back[1] - 0.1).abs() < 1e-3);
        assert_ne!(back[1], 0.1);
    }

    #[test]
    fn test_assign_len_mismatch() {
        let mut buf = CpuBuffer::zeros(DType::F64, 3);
        let err = buf.assign_from_f32(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_assign_from_f64_into_bf16() {
        let mut buf = CpuBuffer::zeros(DType::BF16, 2);
        buf.assign_from_f64(&[1.0, -4.0]).unwrap();
        assert_eq!(buf.to_f64_vec(), vec![1.0, -4.0]);
    }
}
