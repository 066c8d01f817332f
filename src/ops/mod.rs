//! The five BLAS dispatch entry points.
//!
//! Every operation follows the same shape: validate operands, normalize
//! layouts (borrowing the caller's views or materializing call-scoped
//! temporary copies), check the result operand's layout, resolve a single
//! call order with per-operand transpose flags, then hand the fully
//! resolved parameters to the backend call adapter. Temporaries drop on
//! every exit path.

mod adapter;
mod batched;
mod normalize;
mod resolve;
mod validate;

use crate::backend::{BackendStatus, BlasBackend};
use crate::dtype::DType;
use crate::layout::{self, Transpose};
use crate::view::ArrayView;

#[derive(Debug, thiserror::Error)]
pub enum BlasError {
    #[error("dtype {0} is not supported by the BLAS backend")]
    InvalidDType(DType),
    #[error("wrong number of dimensions for {operand}: {actual} (expected {expected})")]
    RankMismatch {
        operand: &'static str,
        actual: usize,
        expected: usize,
    },
    #[error("inconsistent dtypes: {0} and {1}")]
    DTypeMismatch(DType, DType),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("operand {0} is unaligned")]
    UnalignedOperand(&'static str),
    #[error("copy required for {0} but copying is disabled")]
    CopyRequired(&'static str),
    #[error("unsupported layout for {0}")]
    UnsupportedLayout(&'static str),
    #[error("allocation failure: {0}")]
    AllocationFailure(String),
    #[error("backend error: {0}")]
    Backend(BackendStatus),
}

impl From<BackendStatus> for BlasError {
    fn from(status: BackendStatus) -> Self {
        match status {
            BackendStatus::AllocFailed(msg) => BlasError::AllocationFailure(msg),
            other => BlasError::Backend(other),
        }
    }
}

/// Dispatches strided array operations onto a [`BlasBackend`].
pub struct BlasDispatcher<B: BlasBackend> {
    backend: B,
}

impl<B: BlasBackend> BlasDispatcher<B> {
    pub fn new(backend: B) -> Self {
        BlasDispatcher { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `z = x · y` for rank-1 `x`, `y` and a rank-0 result `z`.
    pub fn dot(
        &self,
        x: &ArrayView<B::Buffer>,
        y: &ArrayView<B::Buffer>,
        z: &ArrayView<B::Buffer>,
        allow_copy: bool,
    ) -> Result<(), BlasError> {
        let dtype = validate::blas_dtype(x)?;
        validate::rank("X", x, 1)?;
        validate::rank("Y", y, 1)?;
        validate::rank("Z", z, 0)?;
        validate::same_dtype(x, &[y, z])?;
        validate::aligned(&[("X", x), ("Y", y), ("Z", z)])?;
        let n = x.shape[0];
        if y.shape[0] != n {
            return Err(BlasError::ShapeMismatch(format!(
                "X has length {n} but Y has length {}",
                y.shape[0]
            )));
        }

        let es = dtype.size();
        let xp = normalize::vector(&self.backend, x, allow_copy, "X")?;
        let yp = normalize::vector(&self.backend, y, allow_copy, "Y")?;

        self.backend.setup()?;
        adapter::dot(
            &self.backend,
            dtype,
            n,
            (&xp.buffer, xp.offset / es, xp.strides[0] / es as isize),
            (&yp.buffer, yp.offset / es, yp.strides[0] / es as isize),
            (&z.buffer, z.offset / es),
        )?;
        Ok(())
    }

    /// `y = alpha * op(A) x + beta * y`.
    pub fn gemv(
        &self,
        trans_a: Transpose,
        alpha: f64,
        a: &ArrayView<B::Buffer>,
        x: &ArrayView<B::Buffer>,
        beta: f64,
        y: &ArrayView<B::Buffer>,
        allow_copy: bool,
    ) -> Result<(), BlasError> {
        let dtype = validate::blas_dtype(a)?;
        validate::rank("A", a, 2)?;
        validate::rank("X", x, 1)?;
        validate::rank("Y", y, 1)?;
        validate::same_dtype(a, &[x, y])?;
        validate::aligned(&[("A", a), ("X", x), ("Y", y)])?;

        let (rows, cols) = validate::trans_dims(trans_a, a.shape[0], a.shape[1]);
        if y.shape[0] != rows || x.shape[0] != cols {
            return Err(BlasError::ShapeMismatch(format!(
                "op(A) is {rows}x{cols} but Y has length {} and X has length {}",
                y.shape[0], x.shape[0]
            )));
        }
        // The backend receives A's stored dimensions plus the flag.
        let (m, n) = (a.shape[0], a.shape[1]);

        let es = dtype.size();
        let ap = normalize::matrix(&self.backend, a, allow_copy, "A")?;
        let xp = normalize::vector(&self.backend, x, allow_copy, "X")?;
        if y.strides[0] < 0 {
            return Err(BlasError::UnsupportedLayout("Y"));
        }

        let (order, lda) = resolve::order_from_2d(&*ap, "A")?;

        self.backend.setup()?;
        adapter::gemv(
            &self.backend,
            dtype,
            order,
            trans_a,
            m,
            n,
            alpha,
            (&ap.buffer, ap.offset / es, lda),
            (&xp.buffer, xp.offset / es, xp.strides[0] / es as isize),
            beta,
            (&y.buffer, y.offset / es, y.strides[0] / es as isize),
        )?;
        Ok(())
    }

    /// `C = alpha * op(A) op(B) + beta * C`.
    pub fn gemm(
        &self,
        trans_a: Transpose,
        trans_b: Transpose,
        alpha: f64,
        a: &ArrayView<B::Buffer>,
        b: &ArrayView<B::Buffer>,
        beta: f64,
        c: &ArrayView<B::Buffer>,
        allow_copy: bool,
    ) -> Result<(), BlasError> {
        let dtype = validate::blas_dtype(a)?;
        validate::rank("A", a, 2)?;
        validate::rank("B", b, 2)?;
        validate::rank("C", c, 2)?;
        validate::same_dtype(a, &[b, c])?;
        validate::aligned(&[("A", a), ("B", b), ("C", c)])?;

        let (m, k) = validate::trans_dims(trans_a, a.shape[0], a.shape[1]);
        let (bk, n) = validate::trans_dims(trans_b, b.shape[0], b.shape[1]);
        if bk != k {
            return Err(BlasError::ShapeMismatch(format!(
                "op(A) has {k} columns but op(B) has {bk} rows"
            )));
        }
        if c.shape[0] != m || c.shape[1] != n {
            return Err(BlasError::ShapeMismatch(format!(
                "C is {}x{} but op(A) op(B) is {m}x{n}",
                c.shape[0], c.shape[1]
            )));
        }

        let es = dtype.size();
        let ap = normalize::matrix(&self.backend, a, allow_copy, "A")?;
        let bp = normalize::matrix(&self.backend, b, allow_copy, "B")?;
        if !layout::is_one_segment(c) {
            return Err(BlasError::UnsupportedLayout("C"));
        }

        let (order, ldc) = resolve::order_from_2d(c, "C")?;
        let ra = resolve::matrix_in_order(&*ap, order, trans_a, "A")?;
        let rb = resolve::matrix_in_order(&*bp, order, trans_b, "B")?;

        self.backend.setup()?;
        adapter::gemm(
            &self.backend,
            dtype,
            order,
            ra.trans,
            rb.trans,
            m,
            n,
            k,
            alpha,
            (&ap.buffer, ap.offset / es, ra.ld),
            (&bp.buffer, bp.offset / es, rb.ld),
            beta,
            (&c.buffer, c.offset / es, ldc),
        )?;
        Ok(())
    }

    /// Rank-1 update `A = alpha * x y^T + A`.
    pub fn ger(
        &self,
        alpha: f64,
        x: &ArrayView<B::Buffer>,
        y: &ArrayView<B::Buffer>,
        a: &ArrayView<B::Buffer>,
        allow_copy: bool,
    ) -> Result<(), BlasError> {
        let dtype = validate::blas_dtype(x)?;
        validate::rank("X", x, 1)?;
        validate::rank("Y", y, 1)?;
        validate::rank("A", a, 2)?;
        validate::same_dtype(x, &[y, a])?;
        validate::aligned(&[("X", x), ("Y", y), ("A", a)])?;

        let m = x.shape[0];
        let n = y.shape[0];
        if a.shape[0] != m || a.shape[1] != n {
            return Err(BlasError::ShapeMismatch(format!(
                "A is {}x{} but x y^T is {m}x{n}",
                a.shape[0], a.shape[1]
            )));
        }

        let es = dtype.size();
        let xp = normalize::vector(&self.backend, x, allow_copy, "X")?;
        let yp = normalize::vector(&self.backend, y, allow_copy, "Y")?;
        if !layout::is_one_segment(a) {
            return Err(BlasError::UnsupportedLayout("A"));
        }

        let (order, lda) = resolve::order_from_2d(a, "A")?;

        self.backend.setup()?;
        adapter::ger(
            &self.backend,
            dtype,
            order,
            m,
            n,
            alpha,
            (&xp.buffer, xp.offset / es, xp.strides[0] / es as isize),
            (&yp.buffer, yp.offset / es, yp.strides[0] / es as isize),
            (&a.buffer, a.offset / es, lda),
        )?;
        Ok(())
    }

    /// Batched `C[i] = alpha * op(A[i]) op(B[i]) + beta * C[i]` over the
    /// leading (batch) dimension of three rank-3 operands.
    pub fn gemm_batched_3d(
        &self,
        trans_a: Transpose,
        trans_b: Transpose,
        alpha: f64,
        a: &ArrayView<B::Buffer>,
        b: &ArrayView<B::Buffer>,
        beta: f64,
        c: &ArrayView<B::Buffer>,
        allow_copy: bool,
    ) -> Result<(), BlasError> {
        let dtype = validate::blas_dtype(a)?;
        validate::rank("A", a, 3)?;
        validate::rank("B", b, 3)?;
        validate::rank("C", c, 3)?;
        validate::same_dtype(a, &[b, c])?;
        validate::aligned(&[("A", a), ("B", b), ("C", c)])?;

        let batch_count = a.shape[0];
        if b.shape[0] != batch_count || c.shape[0] != batch_count {
            return Err(BlasError::ShapeMismatch(format!(
                "batch dimensions disagree: A {batch_count}, B {}, C {}",
                b.shape[0], c.shape[0]
            )));
        }
        let (m, k) = validate::trans_dims(trans_a, a.shape[1], a.shape[2]);
        let (bk, n) = validate::trans_dims(trans_b, b.shape[1], b.shape[2]);
        if bk != k {
            return Err(BlasError::ShapeMismatch(format!(
                "op(A) items have {k} columns but op(B) items have {bk} rows"
            )));
        }
        if c.shape[1] != m || c.shape[2] != n {
            return Err(BlasError::ShapeMismatch(format!(
                "C items are {}x{} but op(A) op(B) items are {m}x{n}",
                c.shape[1], c.shape[2]
            )));
        }

        let es = dtype.size();
        let (ap, a_class) = normalize::batched(&self.backend, a, allow_copy, "A")?;
        let (bp, b_class) = normalize::batched(&self.backend, b, allow_copy, "B")?;
        let c_class = layout::classify_trailing_2d(&c.shape, &c.strides, es);
        if !c_class.any() {
            return Err(BlasError::UnsupportedLayout("C"));
        }

        let (order, ldc) = resolve::order_from_batched(c, c_class, es, "C")?;
        let ra = resolve::batched_in_order(&*ap, a_class, order, trans_a, es, "A")?;
        let rb = resolve::batched_in_order(&*bp, b_class, order, trans_b, es, "B")?;

        self.backend.setup()?;
        batched::dispatch(
            &self.backend,
            dtype,
            order,
            ra.trans,
            rb.trans,
            m,
            n,
            k,
            alpha,
            &ap,
            ra.ld,
            &bp,
            rb.ld,
            beta,
            c,
            ldc,
            batch_count,
        )
    }
}
