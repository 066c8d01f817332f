//! Backend call adapter: instantiates the generic backend kernel at the
//! resolved element type and narrows the f64 scalar coefficients to the
//! kernel's coefficient type. Pure dispatch, no validation.

use half::f16;

use crate::backend::{BackendStatus, BlasBackend};
use crate::dtype::FloatDType;
use crate::layout::{MatrixOrder, Transpose};

#[allow(clippy::too_many_arguments)]
pub(crate) fn dot<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    n: usize,
    x: (&B::Buffer, usize, isize),
    y: (&B::Buffer, usize, isize),
    z: (&B::Buffer, usize),
) -> Result<(), BackendStatus> {
    match dtype {
        FloatDType::F16 => backend.dot::<f16>(n, x.0, x.1, x.2, y.0, y.1, y.2, z.0, z.1),
        FloatDType::F32 => backend.dot::<f32>(n, x.0, x.1, x.2, y.0, y.1, y.2, z.0, z.1),
        FloatDType::F64 => backend.dot::<f64>(n, x.0, x.1, x.2, y.0, y.1, y.2, z.0, z.1),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemv<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: f64,
    a: (&B::Buffer, usize, usize),
    x: (&B::Buffer, usize, isize),
    beta: f64,
    y: (&B::Buffer, usize, isize),
) -> Result<(), BackendStatus> {
    match dtype {
        FloatDType::F16 => backend.gemv::<f16>(
            order, trans, m, n, alpha as f32, a.0, a.1, a.2, x.0, x.1, x.2, beta as f32, y.0,
            y.1, y.2,
        ),
        FloatDType::F32 => backend.gemv::<f32>(
            order, trans, m, n, alpha as f32, a.0, a.1, a.2, x.0, x.1, x.2, beta as f32, y.0,
            y.1, y.2,
        ),
        FloatDType::F64 => backend.gemv::<f64>(
            order, trans, m, n, alpha, a.0, a.1, a.2, x.0, x.1, x.2, beta, y.0, y.1, y.2,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemm<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: (&B::Buffer, usize, usize),
    b: (&B::Buffer, usize, usize),
    beta: f64,
    c: (&B::Buffer, usize, usize),
) -> Result<(), BackendStatus> {
    match dtype {
        FloatDType::F16 => backend.gemm::<f16>(
            order, trans_a, trans_b, m, n, k, alpha as f32, a.0, a.1, a.2, b.0, b.1, b.2,
            beta as f32, c.0, c.1, c.2,
        ),
        FloatDType::F32 => backend.gemm::<f32>(
            order, trans_a, trans_b, m, n, k, alpha as f32, a.0, a.1, a.2, b.0, b.1, b.2,
            beta as f32, c.0, c.1, c.2,
        ),
        FloatDType::F64 => backend.gemm::<f64>(
            order, trans_a, trans_b, m, n, k, alpha, a.0, a.1, a.2, b.0, b.1, b.2, beta, c.0,
            c.1, c.2,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn ger<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    m: usize,
    n: usize,
    alpha: f64,
    x: (&B::Buffer, usize, isize),
    y: (&B::Buffer, usize, isize),
    a: (&B::Buffer, usize, usize),
) -> Result<(), BackendStatus> {
    match dtype {
        FloatDType::F16 => backend.ger::<f16>(
            order, m, n, alpha as f32, x.0, x.1, x.2, y.0, y.1, y.2, a.0, a.1, a.2,
        ),
        FloatDType::F32 => backend.ger::<f32>(
            order, m, n, alpha as f32, x.0, x.1, x.2, y.0, y.1, y.2, a.0, a.1, a.2,
        ),
        FloatDType::F64 => {
            backend.ger::<f64>(order, m, n, alpha, x.0, x.1, x.2, y.0, y.1, y.2, a.0, a.1, a.2)
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemm_strided_batched<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: (&B::Buffer, usize, usize, isize),
    b: (&B::Buffer, usize, usize, isize),
    beta: f64,
    c: (&B::Buffer, usize, usize, isize),
    batch_count: usize,
) -> Result<(), BackendStatus> {
    match dtype {
        FloatDType::F16 => backend.gemm_strided_batched::<f16>(
            order, trans_a, trans_b, m, n, k, alpha as f32, a.0, a.1, a.2, a.3, b.0, b.1, b.2,
            b.3, beta as f32, c.0, c.1, c.2, c.3, batch_count,
        ),
        FloatDType::F32 => backend.gemm_strided_batched::<f32>(
            order, trans_a, trans_b, m, n, k, alpha as f32, a.0, a.1, a.2, a.3, b.0, b.1, b.2,
            b.3, beta as f32, c.0, c.1, c.2, c.3, batch_count,
        ),
        FloatDType::F64 => backend.gemm_strided_batched::<f64>(
            order, trans_a, trans_b, m, n, k, alpha, a.0, a.1, a.2, a.3, b.0, b.1, b.2, b.3,
            beta, c.0, c.1, c.2, c.3, batch_count,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemm_batch<B: BlasBackend>(
    backend: &B,
    dtype: FloatDType,
    order: MatrixOrder,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: (&[(B::Buffer, usize)], usize),
    b: (&[(B::Buffer, usize)], usize),
    beta: f64,
    c: (&[(B::Buffer, usize)], usize),
) -> Result<(), BackendStatus> {
    match dtype {
        FloatDType::F16 => backend.gemm_batch::<f16>(
            order, trans_a, trans_b, m, n, k, alpha as f32, a.0, a.1, b.0, b.1, beta as f32,
            c.0, c.1,
        ),
        FloatDType::F32 => backend.gemm_batch::<f32>(
            order, trans_a, trans_b, m, n, k, alpha as f32, a.0, a.1, b.0, b.1, beta as f32,
            c.0, c.1,
        ),
        FloatDType::F64 => backend.gemm_batch::<f64>(
            order, trans_a, trans_b, m, n, k, alpha, a.0, a.1, b.0, b.1, beta, c.0, c.1,
        ),
    }
}
