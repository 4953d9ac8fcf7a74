use super::*;
use crate::tensor::Tensor;
use crate::types::DType;

#[test]
fn test_zeros_like() {
    let tensor = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![1, 3]).unwrap();
    let zeros_t = zeros_like(&tensor).unwrap();
    assert_eq!(zeros_t.shape(), tensor.shape());
    assert_eq!(zeros_t.numel(), tensor.numel());
    assert_eq!(zeros_t.dtype(), DType::F32);
    assert!(zeros_t.get_f32_data().unwrap().iter().all(|&x| x == 0.0));
}

#[test]
fn test_zeros() {
    let shape = vec![2, 3];
    let t = zeros(&shape, DType::F64).unwrap();
    assert_eq!(t.shape(), shape.as_slice());
    assert_eq!(t.numel(), 6);
    assert_eq!(t.dtype(), DType::F64);
    assert_eq!(t.get_f64_data().unwrap(), vec![0.0; 6]);
}

#[test]
fn test_zeros_scalar_shape() {
    let t = zeros(&[], DType::F32).unwrap();
    assert!(t.shape().is_empty());
    assert_eq!(t.numel(), 1);
}

#[test]
fn test_zeros_like_with_dtype_widens_half() {
    let half = full(&[2, 2], 3.0, DType::BF16).unwrap();
    let moments = zeros_like_with_dtype(&half, half.dtype().compute_dtype()).unwrap();
    assert_eq!(moments.dtype(), DType::F32);
    assert_eq!(moments.shape(), &[2, 2]);
}

#[test]
fn test_ones_and_full() {
    let o = ones(&[3], DType::F32).unwrap();
    assert_eq!(o.get_f32_data().unwrap(), vec![1.0, 1.0, 1.0]);

    let f = full(&[2], 0.5, DType::F16).unwrap();
    assert_eq!(f.dtype(), DType::F16);
    assert_eq!(f.to_f32_vec(), vec![0.5, 0.5]);
}
