use half::f16;
use strided_blas::backends::HostBackend;
use strided_blas::{ArrayView, BlasDispatcher, BlasError, BlasScalar, DTypeOfPrimitive};

use crate::dispatch_tests::{assert_close, buffer_of, contiguous, read_all};

fn dot_case<T: BlasScalar>(d: &BlasDispatcher<HostBackend>) {
    let x = contiguous::<T>(&[1.0, -2.5, 3.0, 0.5], &[4]);
    let y = contiguous::<T>(&[2.0, 4.0, 0.25, -1.0], &[4]);
    let z = ArrayView::new(buffer_of::<T>(&[0.0]), T::DTYPE, vec![], vec![], 0);
    d.dot(&x, &y, &z, true).unwrap();
    assert_close(&read_all::<T>(&z.buffer), &[-7.75], 1e-2);
}

pub fn test_dot_f16(d: &BlasDispatcher<HostBackend>) {
    dot_case::<f16>(d)
}

pub fn test_dot_f32(d: &BlasDispatcher<HostBackend>) {
    dot_case::<f32>(d)
}

pub fn test_dot_f64(d: &BlasDispatcher<HostBackend>) {
    dot_case::<f64>(d)
}

fn reversed_vector(values: &[f64]) -> ArrayView<strided_blas::backends::HostBuffer> {
    let es = size_of::<f32>();
    let n = values.len();
    ArrayView::new(
        buffer_of::<f32>(values),
        f32::DTYPE,
        vec![n],
        vec![-(es as isize)],
        (n - 1) * es,
    )
}

/// A negative-stride operand with copying permitted must agree with a
/// manually pre-reversed contiguous operand.
pub fn test_dot_reversed_operand(d: &BlasDispatcher<HostBackend>) {
    let x = reversed_vector(&[1.0, 2.0, 3.0, 4.0]);
    let y = contiguous::<f32>(&[1.0, 2.0, 0.5, 0.25], &[4]);
    let z = ArrayView::new(buffer_of::<f32>(&[0.0]), f32::DTYPE, vec![], vec![], 0);
    d.dot(&x, &y, &z, true).unwrap();

    let x_manual = contiguous::<f32>(&[4.0, 3.0, 2.0, 1.0], &[4]);
    let z_manual = ArrayView::new(buffer_of::<f32>(&[0.0]), f32::DTYPE, vec![], vec![], 0);
    d.dot(&x_manual, &y, &z_manual, false).unwrap();

    assert_close(&read_all::<f32>(&z.buffer), &read_all::<f32>(&z_manual.buffer), 0.0);
    assert_close(&read_all::<f32>(&z.buffer), &[11.25], 1e-6);
}

pub fn test_dot_reversed_nocopy_fails(d: &BlasDispatcher<HostBackend>) {
    let x = reversed_vector(&[1.0, 2.0, 3.0, 4.0]);
    let y = contiguous::<f32>(&[1.0, 1.0, 1.0, 1.0], &[4]);
    let z = ArrayView::new(buffer_of::<f32>(&[0.0]), f32::DTYPE, vec![], vec![], 0);
    let err = d.dot(&x, &y, &z, false).unwrap_err();
    assert!(matches!(err, BlasError::CopyRequired("X")));
}

fn ger_case<T: BlasScalar>(d: &BlasDispatcher<HostBackend>) {
    let x = contiguous::<T>(&[1.0, 2.0], &[2]);
    let y = contiguous::<T>(&[3.0, -0.5, 1.0], &[3]);
    let a = contiguous::<T>(&[1.0; 6], &[2, 3]);
    d.ger(2.0, &x, &y, &a, true).unwrap();
    assert_close(
        &read_all::<T>(&a.buffer),
        &[7.0, 0.0, 3.0, 13.0, -1.0, 5.0],
        1e-2,
    );
}

pub fn test_ger_f16(d: &BlasDispatcher<HostBackend>) {
    ger_case::<f16>(d)
}

pub fn test_ger_f32(d: &BlasDispatcher<HostBackend>) {
    ger_case::<f32>(d)
}

pub fn test_ger_f64(d: &BlasDispatcher<HostBackend>) {
    ger_case::<f64>(d)
}

/// ger's result matrix is never copied; a reversed x is.
pub fn test_ger_reversed_x(d: &BlasDispatcher<HostBackend>) {
    let x = reversed_vector(&[2.0, 1.0]);
    let y = contiguous::<f32>(&[3.0, -0.5, 1.0], &[3]);
    let a = contiguous::<f32>(&[1.0; 6], &[2, 3]);
    d.ger(2.0, &x, &y, &a, true).unwrap();
    assert_close(
        &read_all::<f32>(&a.buffer),
        &[7.0, 0.0, 3.0, 13.0, -1.0, 5.0],
        1e-6,
    );
}
