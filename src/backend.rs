use half::f16;
use num_traits::Float;

use crate::dtype::DTypeOfPrimitive;
use crate::layout::{MatrixOrder, Transpose};
use crate::view::ArrayView;

/// Status codes reported by backend routines.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum BackendStatus {
    /// The routine is not supported on the active device. For the native
    /// batched entry point this is the signal that triggers per-item
    /// fallback dispatch; everywhere else it is surfaced to the caller.
    #[error("operation not supported on this device")]
    Unsupported,
    #[error("backend allocation failed: {0}")]
    AllocFailed(String),
    #[error("backend routine failed: {0}")]
    RoutineFailed(String),
}

/// Order hint for the generic strided-copy collaborator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CopyOrder {
    Any,
    RowMajor,
    ColMajor,
}

/// Element types the backend kernels are instantiated at.
///
/// `Coeff` is the scalar-coefficient and accumulator type of the kernel:
/// half-precision kernels take single-precision coefficients, matching the
/// usual vendor convention.
pub trait BlasScalar: DTypeOfPrimitive + bytemuck::Pod + Copy + Send + Sync + 'static {
    type Coeff: Float + Copy + Send + Sync + 'static;

    fn to_coeff(self) -> Self::Coeff;
    fn from_coeff(v: Self::Coeff) -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl BlasScalar for f16 {
    type Coeff = f32;

    fn to_coeff(self) -> f32 {
        self.to_f32()
    }
    fn from_coeff(v: f32) -> Self {
        f16::from_f32(v)
    }
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl BlasScalar for f32 {
    type Coeff = f32;

    fn to_coeff(self) -> f32 {
        self
    }
    fn from_coeff(v: f32) -> Self {
        v
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl BlasScalar for f64 {
    type Coeff = f64;

    fn to_coeff(self) -> f64 {
        self
    }
    fn from_coeff(v: f64) -> Self {
        v
    }
    fn from_f64(v: f64) -> Self {
        v
    }
    fn to_f64(self) -> f64 {
        self
    }
}

/// The vendor linear-algebra backend consumed by the dispatcher.
///
/// All offsets, strides, and leading dimensions are in element units; the
/// dispatcher converts from the byte-based view representation before
/// calling in. Kernels operate on dense storage in the given
/// [`MatrixOrder`] and perform no layout checking of their own.
#[allow(clippy::too_many_arguments)]
pub trait BlasBackend {
    /// Device buffer handle. Clones alias the same storage; the storage is
    /// released when the last handle drops.
    type Buffer: Clone;

    /// Idempotent lazy initialization of the backend handle. Called
    /// unconditionally before every dispatch.
    fn setup(&self) -> Result<(), BackendStatus>;

    /// Allocate a fresh buffer of `len` bytes.
    fn alloc(&self, len: usize) -> Result<Self::Buffer, BackendStatus>;

    /// Generic strided copy: materialize `src` as a freshly allocated
    /// contiguous view in the hinted order.
    fn copy_strided(
        &self,
        src: &ArrayView<Self::Buffer>,
        order: CopyOrder,
    ) -> Result<ArrayView<Self::Buffer>, BackendStatus>;

    fn dot<T: BlasScalar>(
        &self,
        n: usize,
        x: &Self::Buffer,
        x_offset: usize,
        incx: isize,
        y: &Self::Buffer,
        y_offset: usize,
        incy: isize,
        z: &Self::Buffer,
        z_offset: usize,
    ) -> Result<(), BackendStatus>;

    fn gemv<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans: Transpose,
        m: usize,
        n: usize,
        alpha: T::Coeff,
        a: &Self::Buffer,
        a_offset: usize,
        lda: usize,
        x: &Self::Buffer,
        x_offset: usize,
        incx: isize,
        beta: T::Coeff,
        y: &Self::Buffer,
        y_offset: usize,
        incy: isize,
    ) -> Result<(), BackendStatus>;

    fn gemm<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T::Coeff,
        a: &Self::Buffer,
        a_offset: usize,
        lda: usize,
        b: &Self::Buffer,
        b_offset: usize,
        ldb: usize,
        beta: T::Coeff,
        c: &Self::Buffer,
        c_offset: usize,
        ldc: usize,
    ) -> Result<(), BackendStatus>;

    fn ger<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        m: usize,
        n: usize,
        alpha: T::Coeff,
        x: &Self::Buffer,
        x_offset: usize,
        incx: isize,
        y: &Self::Buffer,
        y_offset: usize,
        incy: isize,
        a: &Self::Buffer,
        a_offset: usize,
        lda: usize,
    ) -> Result<(), BackendStatus>;

    /// Native batched matrix multiply over a strided stack.
    fn gemm_strided_batched<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T::Coeff,
        a: &Self::Buffer,
        a_offset: usize,
        lda: usize,
        a_batch_stride: isize,
        b: &Self::Buffer,
        b_offset: usize,
        ldb: usize,
        b_batch_stride: isize,
        beta: T::Coeff,
        c: &Self::Buffer,
        c_offset: usize,
        ldc: usize,
        c_batch_stride: isize,
        batch_count: usize,
    ) -> Result<(), BackendStatus>;

    /// Batched matrix multiply over explicit per-item buffer/offset pairs.
    /// Fallback primitive used when [`Self::gemm_strided_batched`] reports
    /// [`BackendStatus::Unsupported`].
    fn gemm_batch<T: BlasScalar>(
        &self,
        order: MatrixOrder,
        trans_a: Transpose,
        trans_b: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: T::Coeff,
        a: &[(Self::Buffer, usize)],
        lda: usize,
        b: &[(Self::Buffer, usize)],
        ldb: usize,
        beta: T::Coeff,
        c: &[(Self::Buffer, usize)],
        ldc: usize,
    ) -> Result<(), BackendStatus>;
}
