//! Host-memory reference backend.
//!
//! Implements the backend contract with naive kernels over plain byte
//! buffers. Useful as a CPU fallback and as the test backend; the
//! `without_native_batched` constructor simulates a device lacking the
//! native batched entry point so the per-item fallback path can be
//! exercised.

use std::sync::{Arc, OnceLock, RwLock};

use num_traits::Zero;

use crate::backend::{BackendStatus, BlasBackend, BlasScalar, CopyOrder};
use crate::layout::{MatrixOrder, Transpose};
use crate::view::{ArrayView, packed_col_major_strides, packed_row_major_strides};

/// Refcounted host buffer. Clones alias the same storage.
#[derive(Debug, Clone)]
pub struct HostBuffer(Arc<RwLock<Vec<u8>>>);

impl HostBuffer {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        HostBuffer(Arc::new(RwLock::new(bytes)))
    }

    pub fn from_slice<T: BlasScalar>(values: &[T]) -> Self {
        Self::from_bytes(bytemuck::cast_slice(values).to_vec())
    }

    pub fn to_vec<T: BlasScalar>(&self) -> Vec<T> {
        bytemuck::cast_slice(&self.0.read().unwrap()).to_vec()
    }

    pub fn len(&self) -> usize {
        self.0.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<u8> {
        self.0.read().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct HostBackend {
    handle: OnceLock<()>,
    native_batched: bool,
}

impl Default for HostBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBackend {
    pub fn new() -> Self {
        HostBackend {
            handle: OnceLock::new(),
            native_batched: true,
        }
    }

    /// A backend whose native batched entry point reports
    /// [`BackendStatus::Unsupported`], forcing per-item dispatch.
    pub fn without_native_batched() -> Self {
        HostBackend {
            handle: OnceLock::new(),
            native_batched: false,
        }
    }
}

fn load<T: BlasScalar>(bytes: &[u8], index: isize) -> T {
    let start = index as usize * size_of::<T>();
    bytemuck::pod_read_unaligned(&bytes[start..start + size_of::<T>()])
}

fn store<T: BlasScalar>(bytes: &mut [u8], index: isize, value: T) {
    let start = index as usize * size_of::<T>();
    bytes[start..start + size_of::<T>()].copy_from_slice(bytemuck::bytes_of(&value));
}

/// Storage index of the (row, col) element of a matrix operand, honoring
/// the call order and the operand's transpose flag.
fn mat_index(
    order: MatrixOrder,
    trans: Transpose,
    base: usize,
    ld: usize,
    row: usize,
    col: usize,
) -> isize {
    let (r, c) = match trans {
        Transpose::No => (row, col),
        Transpose::Trans => (col, row),
    };
    let idx = match order {
        MatrixOrder::ColMajor => base + r + c * ld,
        MatrixOrder::RowMajor => base + r * ld + c,
    };
    idx as isize
}

#[allow(clippy::too_many_arguments)]
fn gemm_kernel<T: BlasScalar>(
    a_bytes: &[u8],
    b_bytes: &[u8],
    c_bytes: &mut [u8],
    order: MatrixOrder,
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T::Coeff,
    a_offset: usize,
    lda: usize,
    b_offset: usize,
    ldb: usize,
    beta: T::Coeff,
    c_offset: usize,
    ldc: usize,
) {
    for i in 0..m {
        for j in 0..n {
            let mut acc = T::Coeff::zero();
            for l in 0..k {
                let av: T = load(a_bytes, mat_index(order, trans_a, a_offset, lda, i, l));
                let bv: T = load(b_bytes, mat_index(order, trans_b, b_offset, ldb, l, j));
                acc = acc + av.to_coeff() * bv.to_coeff();
            }
            let ci = mat_index(order, Transpose::No, c_offset, ldc, i, j);
            let out = if beta.is_zero() {
                alpha * acc
            } else {
                let prev: T = load(c_bytes, ci);
                alpha * acc + beta * prev.to_coeff()
            };
            store(c_bytes, ci, T::from_coeff(out));
        }
    }
}

impl BlasBackend for HostBackend {
    type Buffer = HostBuffer;

    fn setup(&self) -> Result<(), BackendStatus> {
        self.handle.get_or_init(|| {
            log::debug!("host BLAS backend initialized");
        });
        Ok(())
    }

    fn alloc(&self, len: usize) -> Result<HostBuffer, BackendStatus> {
        Ok(HostBuffer::from_bytes(vec![0u8; len]))
    }

    fn copy_strided(
        &self,
        src: &ArrayView<HostBuffer>,
        order: CopyOrder,
    ) -> Result<ArrayView<HostBuffer>, BackendStatus> {
        let es = src.dtype.size();
        let count: usize = src.shape.iter().product();
        let dst_buffer = self.alloc(count * es)?;
        let dst_strides = match order {
            CopyOrder::ColMajor => packed_col_major_strides(&src.shape, es),
            // Any-order copies come out row-major.
            CopyOrder::Any | CopyOrder::RowMajor => packed_row_major_strides(&src.shape, es),
        };
        {
            let src_bytes = src.buffer.0.read().unwrap();
            let mut dst_bytes = dst_buffer.0.write().unwrap();
            for flat in 0..count {
                let mut rem = flat;
                let mut src_off = src.offset as isize;
                let mut dst_off = 0isize;
                for d in (0..src.rank()).rev() {
                    let idx = (rem % src.shape[d]) as isize;
                    rem /= src.shape[d];
                    src_off += idx * src.strides[d];
                    dst_off += idx * dst_strides[d];
                }
                let (s, d) = (src_off as usize, dst_off as usize);
                dst_bytes[d..d + es].copy_from_slice(&src_bytes[s..s + es]);
            }
        }
        Ok(ArrayView::new(
            dst_buffer,
            src.dtype,
            src.shape.clone(),
            dst_strides,
            0,
        ))
    }

    fn dot<T: BlasScalar>(
        &self,
        n: usize,
        x: &HostBuffer,
        x_offset: usize,
        incx: isize,
        y: &HostBuffer,
        y_offset: usize,
        incy: isize,
        z: &HostBuffer,
        z_offset: usize,
    ) -> Result<(), BackendStatus> {
        let x_bytes = x.snapshot();
        let y_bytes = y.snapshot();
        let mut acc = T::Coeff::zero();
        for i in 0..n {
            let xv: T = load(&x_bytes, x_offset as isize + i as isize * incx);
            let yv: T = load(&y_bytes, y_offset as isize + i as isize * incy);
            acc = acc + xv.to_coeff() * yv.to_coeff();
        }
        let mut z_bytes = z.0.write().unwrap();
        store(&mut z_bytes, z_offset as isize, T::from_coeff(acc));
        Ok(())
    }

    fn gemv<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans: Transpose,
        m: usize,
        n: usize,
        alpha: T::Coeff,
        a: &HostBuffer,
        a_offset: usize,
        lda: usize,
        x: &HostBuffer,
        x_offset: usize,
        incx: isize,
        beta: T::Coeff,
        y: &HostBuffer,
        y_offset: usize,
        incy: isize,
    ) -> Result<(), BackendStatus> {
        let a_bytes = a.snapshot();
        let x_bytes = x.snapshot();
        let (rows, cols) = match trans {
            Transpose::No => (m, n),
            Transpose::Trans => (n, m),
        };
        let mut y_bytes = y.0.write().unwrap();
        for i in 0..rows {
            let mut acc = T::Coeff::zero();
            for l in 0..cols {
                let av: T = load(&a_bytes, mat_index(order, trans, a_offset, lda, i, l));
                let xv: T = load(&x_bytes, x_offset as isize + l as isize * incx);
                acc = acc + av.to_coeff() * xv.to_coeff();
            }
            let yi = y_offset as isize + i as isize * incy;
            let out = if beta.is_zero() {
                alpha * acc
            } else {
                let prev: T = load(&y_bytes, yi);
                alpha * acc + beta * prev.to_coeff()
            };
            store(&mut y_bytes, yi, T::from_coeff(out));
        }
        Ok(())
    }

    fn gemm<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T::Coeff,
        a: &HostBuffer,
        a_offset: usize,
        lda: usize,
        b: &HostBuffer,
        b_offset: usize,
        ldb: usize,
        beta: T::Coeff,
        c: &HostBuffer,
        c_offset: usize,
        ldc: usize,
    ) -> Result<(), BackendStatus> {
        let a_bytes = a.snapshot();
        let b_bytes = b.snapshot();
        let mut c_bytes = c.0.write().unwrap();
        gemm_kernel::<T>(
            &a_bytes,
            &b_bytes,
            &mut c_bytes,
            order,
            trans_a,
            trans_b,
            m,
            n,
            k,
            alpha,
            a_offset,
            lda,
            b_offset,
            ldb,
            beta,
            c_offset,
            ldc,
        );
        Ok(())
    }

    fn ger<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        m: usize,
        n: usize,
        alpha: T::Coeff,
        x: &HostBuffer,
        x_offset: usize,
        incx: isize,
        y: &HostBuffer,
        y_offset: usize,
        incy: isize,
        a: &HostBuffer,
        a_offset: usize,
        lda: usize,
    ) -> Result<(), BackendStatus> {
        let x_bytes = x.snapshot();
        let y_bytes = y.snapshot();
        let mut a_bytes = a.0.write().unwrap();
        for i in 0..m {
            let xv: T = load(&x_bytes, x_offset as isize + i as isize * incx);
            for j in 0..n {
                let yv: T = load(&y_bytes, y_offset as isize + j as isize * incy);
                let ai = mat_index(order, Transpose::No, a_offset, lda, i, j);
                let prev: T = load(&a_bytes, ai);
                store(
                    &mut a_bytes,
                    ai,
                    T::from_coeff(prev.to_coeff() + alpha * xv.to_coeff() * yv.to_coeff()),
                );
            }
        }
        Ok(())
    }

    fn gemm_strided_batched<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T::Coeff,
        a: &HostBuffer,
        a_offset: usize,
        lda: usize,
        a_batch_stride: isize,
        b: &HostBuffer,
        b_offset: usize,
        ldb: usize,
        b_batch_stride: isize,
        beta: T::Coeff,
        c: &HostBuffer,
        c_offset: usize,
        ldc: usize,
        c_batch_stride: isize,
        batch_count: usize,
    ) -> Result<(), BackendStatus> {
        if !self.native_batched {
            return Err(BackendStatus::Unsupported);
        }
        let a_bytes = a.snapshot();
        let b_bytes = b.snapshot();
        let mut c_bytes = c.0.write().unwrap();
        for i in 0..batch_count {
            let ii = i as isize;
            gemm_kernel::<T>(
                &a_bytes,
                &b_bytes,
                &mut c_bytes,
                order,
                trans_a,
                trans_b,
                m,
                n,
                k,
                alpha,
                (a_offset as isize + ii * a_batch_stride) as usize,
                lda,
                (b_offset as isize + ii * b_batch_stride) as usize,
                ldb,
                beta,
                (c_offset as isize + ii * c_batch_stride) as usize,
                ldc,
            );
        }
        Ok(())
    }

    fn gemm_batch<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T::Coeff,
        a: &[(HostBuffer, usize)],
        lda: usize,
        b: &[(HostBuffer, usize)],
        ldb: usize,
        beta: T::Coeff,
        c: &[(HostBuffer, usize)],
        ldc: usize,
    ) -> Result<(), BackendStatus> {
        for (((a_buf, a_offset), (b_buf, b_offset)), (c_buf, c_offset)) in
            a.iter().zip(b.iter()).zip(c.iter())
        {
            let a_bytes = a_buf.snapshot();
            let b_bytes = b_buf.snapshot();
            let mut c_bytes = c_buf.0.write().unwrap();
            gemm_kernel::<T>(
                &a_bytes,
                &b_bytes,
                &mut c_bytes,
                order,
                trans_a,
                trans_b,
                m,
                n,
                k,
                alpha,
                *a_offset,
                lda,
                *b_offset,
                ldb,
                beta,
                *c_offset,
                ldc,
            );
        }
        Ok(())
    }
}
