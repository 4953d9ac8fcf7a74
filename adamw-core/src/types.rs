/// Defines the possible storage precisions for Tensor elements.
///
/// The optimizer never does arithmetic in a type narrower than `f32`:
/// see [`DType::compute_dtype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 16-bit IEEE half-precision float.
    F16,
    /// 16-bit brain float (8-bit exponent, 7-bit mantissa).
    BF16,
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}

impl DType {
    /// Precision used for update math on tensors stored as `self`.
    ///
    /// Half types widen to `F32`; `F32` and `F64` are kept as-is.
    pub fn compute_dtype(&self) -> DType {
        match self {
            DType::F16 | DType::BF16 | DType::F32 => DType::F32,
            DType::F64 => DType::F64,
        }
    }

    /// Returns true for the 16-bit storage types.
    pub fn is_half(&self) -> bool {
        matches!(self, DType::F16 | DType::BF16)
    }
}
