// adamw-core/src/tensor/tests.rs

use super::*;
use approx::assert_relative_eq;

#[test]
fn test_new_shape_mismatch() {
    let err = Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]).unwrap_err();
    assert_eq!(
        err,
        CoreError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
fn test_zero_dim_tensor() {
    let t = Tensor::new(vec![1.5], vec![]).unwrap();
    assert!(t.shape().is_empty());
    assert_eq!(t.numel(), 1);
    assert_eq!(t.get_f32_data().unwrap(), vec![1.5]);
}

#[test]
fn test_get_f32_data_rejects_other_dtype() {
    let t = Tensor::new_f64(vec![1.0], vec![1]).unwrap();
    assert!(matches!(
        t.get_f32_data(),
        Err(CoreError::DataTypeMismatch {
            expected: DType::F32,
            actual: DType::F64,
            ..
        })
    ));
}

#[test]
fn test_cast_leaves_source_untouched() {
    let t = Tensor::new_f64(vec![0.25, -1.0], vec![2]).unwrap();
    let c = t.cast(DType::F32);
    assert_eq!(c.dtype(), DType::F32);
    assert_eq!(c.shape(), t.shape());
    assert_eq!(t.dtype(), DType::F64);
    assert_eq!(t.get_f64_data().unwrap(), vec![0.25, -1.0]);
}

#[test]
fn test_as_mut_slice_in_place() {
    let mut t = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    for x in t.as_mut_slice::<f32>().unwrap() {
        *x *= 2.0;
    }
    assert_eq!(t.get_f32_data().unwrap(), vec![2.0, 4.0]);
    assert!(t.as_mut_slice::<f64>().is_err());
}

#[test]
fn test_assign_rounds_into_half_storage() {
    let mut t = Tensor::new_f16(vec![f16::ZERO; 2], vec![2]).unwrap();
    t.assign(&[0.999684f32, 2.0]).unwrap();
    assert_eq!(t.dtype(), DType::F16);
    let back = t.to_f32_vec();
    assert_relative_eq!(back[0], 0.999684, epsilon = 1e-3);
    assert_eq!(back[1], 2.0);
}

#[test]
fn test_add_assign() {
    let mut a = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let b = Tensor::new_f64(vec![0.5, 0.25], vec![2]).unwrap();
    a.add_assign(&b).unwrap();
    assert_eq!(a.dtype(), DType::F32);
    assert_eq!(a.get_f32_data().unwrap(), vec![1.5, 2.25]);
}

#[test]
fn test_add_assign_shape_mismatch() {
    let mut a = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let b = Tensor::new(vec![1.0, 2.0], vec![1, 2]).unwrap();
    assert!(matches!(
        a.add_assign(&b),
        Err(CoreError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_fill_zero() {
    let mut t = Tensor::new_bf16(vec![bf16::ONE; 3], vec![3]).unwrap();
    t.fill_zero();
    assert_eq!(t.dtype(), DType::BF16);
    assert_eq!(t.to_f64_vec(), vec![0.0; 3]);
}
