use strided_blas::backends::{HostBackend, HostBuffer};
use strided_blas::{ArrayView, BlasDispatcher, BlasError, DType, Transpose};

use crate::dispatch_tests::{buffer_of, contiguous};

fn scalar_f32() -> ArrayView<HostBuffer> {
    ArrayView::new(buffer_of::<f32>(&[0.0]), DType::F32, vec![], vec![], 0)
}

pub fn test_dot_invalid_dtype(d: &BlasDispatcher<HostBackend>) {
    let x = ArrayView::contiguous(HostBuffer::from_bytes(vec![0; 16]), DType::I32, &[4]);
    let y = ArrayView::contiguous(HostBuffer::from_bytes(vec![0; 16]), DType::I32, &[4]);
    let z = ArrayView::new(HostBuffer::from_bytes(vec![0; 4]), DType::I32, vec![], vec![], 0);
    let err = d.dot(&x, &y, &z, true).unwrap_err();
    assert!(matches!(err, BlasError::InvalidDType(DType::I32)));
}

pub fn test_dot_dtype_mismatch(d: &BlasDispatcher<HostBackend>) {
    let x = contiguous::<f32>(&[1.0, 2.0], &[2]);
    let y = contiguous::<f64>(&[1.0, 2.0], &[2]);
    let z = scalar_f32();
    let err = d.dot(&x, &y, &z, true).unwrap_err();
    assert!(matches!(
        err,
        BlasError::DTypeMismatch(DType::F32, DType::F64)
    ));
}

pub fn test_dot_rank_mismatch(d: &BlasDispatcher<HostBackend>) {
    let x = contiguous::<f32>(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let y = contiguous::<f32>(&[1.0, 2.0], &[2]);
    let z = scalar_f32();
    let err = d.dot(&x, &y, &z, true).unwrap_err();
    assert!(matches!(
        err,
        BlasError::RankMismatch {
            operand: "X",
            actual: 2,
            expected: 1
        }
    ));
}

pub fn test_dot_length_mismatch(d: &BlasDispatcher<HostBackend>) {
    let x = contiguous::<f32>(&[1.0, 2.0, 3.0], &[3]);
    let y = contiguous::<f32>(&[1.0, 2.0], &[2]);
    let z = scalar_f32();
    let err = d.dot(&x, &y, &z, true).unwrap_err();
    assert!(matches!(err, BlasError::ShapeMismatch(_)));
}

pub fn test_unaligned_operand(d: &BlasDispatcher<HostBackend>) {
    let x = contiguous::<f32>(&[1.0, 2.0], &[2]);
    let mut y = contiguous::<f32>(&[1.0, 2.0], &[2]);
    y.aligned = false;
    let z = scalar_f32();
    let err = d.dot(&x, &y, &z, true).unwrap_err();
    assert!(matches!(err, BlasError::UnalignedOperand("Y")));
}

/// The vector length must be consistent with the matrix dimension implied
/// by the transpose flag.
pub fn test_gemv_shape_mismatch(d: &BlasDispatcher<HostBackend>) {
    let a = contiguous::<f32>(&[1.0; 6], &[2, 3]);
    let x = contiguous::<f32>(&[1.0, 2.0], &[2]); // length 3 required for No
    let y = contiguous::<f32>(&[0.0; 2], &[2]);
    let err = d
        .gemv(Transpose::No, 1.0, &a, &x, 0.0, &y, true)
        .unwrap_err();
    assert!(matches!(err, BlasError::ShapeMismatch(_)));

    // the same operands are consistent under Trans
    let x3 = contiguous::<f32>(&[1.0, 2.0, 3.0], &[3]);
    let y3 = contiguous::<f32>(&[0.0; 3], &[3]);
    d.gemv(Transpose::No, 1.0, &a, &x3, 0.0, &y, true).unwrap();
    d.gemv(Transpose::Trans, 1.0, &a, &x, 0.0, &y3, true).unwrap();
}

pub fn test_gemm_shape_mismatch(d: &BlasDispatcher<HostBackend>) {
    let a = contiguous::<f32>(&[1.0; 6], &[2, 3]);
    let b = contiguous::<f32>(&[1.0; 4], &[2, 2]); // op(B) needs 3 rows
    let c = contiguous::<f32>(&[0.0; 4], &[2, 2]);
    let err = d
        .gemm(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, true)
        .unwrap_err();
    assert!(matches!(err, BlasError::ShapeMismatch(_)));
}

pub fn test_gemv_negative_result_stride_fails(d: &BlasDispatcher<HostBackend>) {
    let es = size_of::<f32>() as isize;
    let a = contiguous::<f32>(&[1.0; 6], &[2, 3]);
    let x = contiguous::<f32>(&[1.0, 2.0, 3.0], &[3]);
    let y = ArrayView::new(
        buffer_of::<f32>(&[0.0, 0.0]),
        DType::F32,
        vec![2],
        vec![-es],
        size_of::<f32>(),
    );
    let err = d.gemv(Transpose::No, 1.0, &a, &x, 0.0, &y, true).unwrap_err();
    assert!(matches!(err, BlasError::UnsupportedLayout("Y")));
}

pub fn test_batched_rank_mismatch(d: &BlasDispatcher<HostBackend>) {
    let a = contiguous::<f32>(&[1.0; 4], &[2, 2]);
    let b = contiguous::<f32>(&[1.0; 8], &[2, 2, 2]);
    let c = contiguous::<f32>(&[0.0; 8], &[2, 2, 2]);
    let err = d
        .gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, true)
        .unwrap_err();
    assert!(matches!(
        err,
        BlasError::RankMismatch {
            operand: "A",
            actual: 2,
            expected: 3
        }
    ));
}

pub fn test_batched_count_mismatch(d: &BlasDispatcher<HostBackend>) {
    let a = contiguous::<f32>(&[1.0; 8], &[2, 2, 2]);
    let b = contiguous::<f32>(&[1.0; 12], &[3, 2, 2]);
    let c = contiguous::<f32>(&[0.0; 8], &[2, 2, 2]);
    let err = d
        .gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, true)
        .unwrap_err();
    assert!(matches!(err, BlasError::ShapeMismatch(_)));
}
