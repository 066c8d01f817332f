//! Batch dispatcher: tries the backend's native strided-batched entry
//! point once, and decomposes into per-item offset tables when (and only
//! when) the backend reports the batched routine unsupported on the
//! active device.

use crate::backend::{BackendStatus, BlasBackend};
use crate::dtype::FloatDType;
use crate::ops::adapter;
use crate::layout::{MatrixOrder, Transpose};
use crate::ops::BlasError;
use crate::view::ArrayView;

#[allow(clippy::too_many_arguments)]
pub(crate) fn dispatch<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: &ArrayView<B::Buffer>,
    lda: usize,
    b: &ArrayView<B::Buffer>,
    ldb: usize,
    beta: f64,
    c: &ArrayView<B::Buffer>,
    ldc: usize,
    batch_count: usize,
) -> Result<(), BlasError> {
    let es = dtype.size();
    let esi = es as isize;

    let native = adapter::gemm_strided_batched(
        backend,
        dtype,
        order,
        trans_a,
        trans_b,
        m,
        n,
        k,
        alpha,
        (&a.buffer, a.offset / es, lda, a.strides[0] / esi),
        (&b.buffer, b.offset / es, ldb, b.strides[0] / esi),
        beta,
        (&c.buffer, c.offset / es, ldc, c.strides[0] / esi),
        batch_count,
    );

    match native {
        Ok(()) => Ok(()),
        Err(BackendStatus::Unsupported) => {
            log::debug!(
                "native batched gemm unsupported on this device, decomposing into {batch_count} per-item calls"
            );
            per_item(
                backend, dtype, order, trans_a, trans_b, m, n, k, alpha, a, lda, b, ldb, beta,
                c, ldc, batch_count,
            )
        }
        Err(other) => Err(other.into()),
    }
}

fn item_offsets<B: BlasBackend>(
    v: &ArrayView<B::Buffer>,
    batch_count: usize,
    es: usize,
) -> Result<Vec<(B::Buffer, usize)>, BlasError> {
    let mut items: Vec<(B::Buffer, usize)> = Vec::new();
    items
        .try_reserve_exact(batch_count)
        .map_err(|e| BlasError::AllocationFailure(e.to_string()))?;
    for i in 0..batch_count {
        let byte_offset = v.offset as isize + i as isize * v.strides[0];
        items.push((v.buffer.clone(), byte_offset as usize / es));
    }
    Ok(items)
}

#[allow(clippy::too_many_arguments)]
fn per_item<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: &ArrayView<B::Buffer>,
    lda: usize,
    b: &ArrayView<B::Buffer>,
    ldb: usize,
    beta: f64,
    c: &ArrayView<B::Buffer>,
    ldc: usize,
    batch_count: usize,
) -> Result<(), BlasError> {
    let es = dtype.size();
    let a_items = item_offsets::<B>(a, batch_count, es)?;
    let b_items = item_offsets::<B>(b, batch_count, es)?;
    let c_items = item_offsets::<B>(c, batch_count, es)?;
    adapter::gemm_batch(
        backend,
        dtype,
        order,
        trans_a,
        trans_b,
        m,
        n,
        k,
        alpha,
        (&a_items, lda),
        (&b_items, ldb),
        beta,
        (&c_items, ldc),
    )
    .map_err(BlasError::from)
}
