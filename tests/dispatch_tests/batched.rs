use half::f16;
use strided_blas::backends::{HostBackend, HostBuffer};
use strided_blas::{ArrayView, BlasDispatcher, BlasError, BlasScalar, DTypeOfPrimitive, Transpose};

use crate::dispatch_tests::{assert_close, buffer_of, contiguous, read_all};

// three 2x2 items
const A_ITEMS: [f64; 12] = [
    1.0, 2.0, 3.0, 4.0, //
    0.5, -1.0, 2.0, 0.0, //
    -2.0, 1.0, 1.0, 1.0,
];
const B_ITEMS: [f64; 12] = [
    1.0, 0.0, 0.0, 1.0, //
    2.0, 1.0, 1.0, 2.0, //
    1.0, -1.0, 1.0, 1.0,
];
const C_ITEMS: [f64; 12] = [
    1.0, 2.0, 3.0, 4.0, //
    0.0, -1.5, 4.0, 2.0, //
    -1.0, 3.0, 2.0, 0.0,
];

/// Runs under both the native-batched and the forced-fallback runner, so
/// passing in both configurations establishes that the two dispatch paths
/// agree item for item.
fn batched_case<T: BlasScalar>(d: &BlasDispatcher<HostBackend>) {
    let a = contiguous::<T>(&A_ITEMS, &[3, 2, 2]);
    let b = contiguous::<T>(&B_ITEMS, &[3, 2, 2]);
    let c = contiguous::<T>(&[0.0; 12], &[3, 2, 2]);
    d.gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, false)
        .unwrap();
    assert_close(&read_all::<T>(&c.buffer), &C_ITEMS, 1e-2);
}

pub fn test_batched_f16(d: &BlasDispatcher<HostBackend>) {
    batched_case::<f16>(d)
}

pub fn test_batched_f32(d: &BlasDispatcher<HostBackend>) {
    batched_case::<f32>(d)
}

pub fn test_batched_f64(d: &BlasDispatcher<HostBackend>) {
    batched_case::<f64>(d)
}

/// The batch dimension may have an arbitrary stride; only the per-item
/// matrices must be contiguous.
pub fn test_batched_strided_batch_dim(d: &BlasDispatcher<HostBackend>) {
    let es = size_of::<f32>() as isize;
    // items at element offsets 0, 8, 16 of a 24-element buffer
    let mut backing = [99.0; 24];
    for (i, chunk) in A_ITEMS.chunks(4).enumerate() {
        backing[i * 8..i * 8 + 4].copy_from_slice(chunk);
    }
    let a = ArrayView::new(
        buffer_of::<f32>(&backing),
        f32::DTYPE,
        vec![3, 2, 2],
        vec![8 * es, 2 * es, es],
        0,
    );
    let b = contiguous::<f32>(&B_ITEMS, &[3, 2, 2]);
    let c = contiguous::<f32>(&[0.0; 12], &[3, 2, 2]);
    d.gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, false)
        .unwrap();
    assert_close(&read_all::<f32>(&c.buffer), &C_ITEMS, 1e-6);
}

/// Column-major items are consumed via a transpose-flag flip, no copy.
pub fn test_batched_col_major_items(d: &BlasDispatcher<HostBackend>) {
    let es = size_of::<f32>() as isize;
    // each item stored column by column
    let a_cm: Vec<f64> = A_ITEMS
        .chunks(4)
        .flat_map(|item| [item[0], item[2], item[1], item[3]])
        .collect();
    let a = ArrayView::new(
        buffer_of::<f32>(&a_cm),
        f32::DTYPE,
        vec![3, 2, 2],
        vec![4 * es, es, 2 * es],
        0,
    );
    let b = contiguous::<f32>(&B_ITEMS, &[3, 2, 2]);
    let c = contiguous::<f32>(&[0.0; 12], &[3, 2, 2]);
    d.gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, false)
        .unwrap();
    assert_close(&read_all::<f32>(&c.buffer), &C_ITEMS, 1e-6);
}

fn reversed_rows_a() -> ArrayView<HostBuffer> {
    let es = size_of::<f32>() as isize;
    // item rows stored right-to-left; per-item matrices are not contiguous
    let a_rev: Vec<f64> = A_ITEMS
        .chunks(4)
        .flat_map(|item| [item[1], item[0], item[3], item[2]])
        .collect();
    ArrayView::new(
        buffer_of::<f32>(&a_rev),
        f32::DTYPE,
        vec![3, 2, 2],
        vec![4 * es, 2 * es, -es],
        es as usize,
    )
}

pub fn test_batched_noncontiguous_item_copied(d: &BlasDispatcher<HostBackend>) {
    let a = reversed_rows_a();
    let b = contiguous::<f32>(&B_ITEMS, &[3, 2, 2]);
    let c = contiguous::<f32>(&[0.0; 12], &[3, 2, 2]);
    d.gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, true)
        .unwrap();
    assert_close(&read_all::<f32>(&c.buffer), &C_ITEMS, 1e-6);
}

pub fn test_batched_noncontiguous_item_nocopy_fails(d: &BlasDispatcher<HostBackend>) {
    let a = reversed_rows_a();
    let b = contiguous::<f32>(&B_ITEMS, &[3, 2, 2]);
    let c = contiguous::<f32>(&[0.0; 12], &[3, 2, 2]);
    let err = d
        .gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, false)
        .unwrap_err();
    assert!(matches!(err, BlasError::CopyRequired("A")));
}

pub fn test_batched_noncontiguous_result_fails(d: &BlasDispatcher<HostBackend>) {
    let es = size_of::<f32>() as isize;
    let a = contiguous::<f32>(&A_ITEMS, &[3, 2, 2]);
    let b = contiguous::<f32>(&B_ITEMS, &[3, 2, 2]);
    // neither trailing axis of C is packed
    let c = ArrayView::new(
        buffer_of::<f32>(&[0.0; 36]),
        f32::DTYPE,
        vec![3, 2, 2],
        vec![12 * es, 4 * es, 2 * es],
        0,
    );
    let err = d
        .gemm_batched_3d(Transpose::No, Transpose::No, 1.0, &a, &b, 0.0, &c, true)
        .unwrap_err();
    assert!(matches!(err, BlasError::UnsupportedLayout("C")));
}
