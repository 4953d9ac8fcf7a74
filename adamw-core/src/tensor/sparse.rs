use crate::error::CoreError;
use crate::tensor::{create, Tensor};
use crate::types::DType;

/// Coordinate-format sparse tensor with flattened row-major indices.
///
/// `values[k]` belongs at flat position `indices[k]` of a dense tensor of
/// `shape`. Duplicate indices are allowed and sum when densified.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseTensor {
    shape: Vec<usize>,
    indices: Vec<usize>,
    values: Tensor,
}

impl SparseTensor {
    /// Builds a sparse tensor from flat indices and a 1-D tensor of values.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `values` is not 1-D with one entry per index.
    /// - `SparseIndexOutOfBounds` if any index is `>= numel(shape)`.
    pub fn new(shape: Vec<usize>, indices: Vec<usize>, values: Tensor) -> Result<Self, CoreError> {
        if values.shape() != [indices.len()] {
            return Err(CoreError::ShapeMismatch {
                expected: vec![indices.len()],
                actual: values.shape().to_vec(),
                operation: "SparseTensor::new".to_string(),
            });
        }
        let numel: usize = shape.iter().product();
        if let Some(&index) = indices.iter().find(|&&i| i >= numel) {
            return Err(CoreError::SparseIndexOutOfBounds { index, numel });
        }
        Ok(SparseTensor {
            shape,
            indices,
            values,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    /// Number of stored (possibly duplicated) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Materializes the dense equivalent, summing duplicate entries.
    pub fn to_dense(&self) -> Result<Tensor, CoreError> {
        let mut dense = vec![0.0f64; self.shape.iter().product()];
        for (&i, v) in self.indices.iter().zip(self.values.to_f64_vec()) {
            dense[i] += v;
        }
        let mut out = create::zeros(&self.shape, self.dtype())?;
        out.assign(&dense)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_to_dense_sums_duplicates() {
        let values = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let sparse = SparseTensor::new(vec![2, 2], vec![0, 3, 3], values).unwrap();
        assert_eq!(sparse.nnz(), 3);
        let dense = sparse.to_dense().unwrap();
        assert_eq!(dense.shape(), &[2, 2]);
        assert_eq!(dense.get_f32_data().unwrap(), vec![1.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_sparse_index_out_of_bounds() {
        let values = Tensor::new(vec![1.0], vec![1]).unwrap();
        let err = SparseTensor::new(vec![2], vec![2], values).unwrap_err();
        assert_eq!(err, CoreError::SparseIndexOutOfBounds { index: 2, numel: 2 });
    }

    #[test]
    fn test_sparse_values_length_mismatch() {
        let values = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
        let err = SparseTensor::new(vec![4], vec![1], values).unwrap_err();
        assert!(matches!(err, CoreError::ShapeMismatch { .. }));
    }
}
