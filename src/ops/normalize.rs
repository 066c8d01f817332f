use crate::backend::{BlasBackend, CopyOrder};
use crate::layout::{self, MatrixClass};
use crate::ops::BlasError;
use crate::view::ArrayView;

/// An operand as the backend will consume it: either the caller's view or
/// a temporary contiguous copy owned by this call.
///
/// The `Owned` variant holds the only handle to its freshly allocated
/// buffer outside the backend, so dropping the operand releases the
/// temporary on every exit path.
pub(crate) enum Operand<'a, Buf> {
    Borrowed(&'a ArrayView<Buf>),
    Owned(ArrayView<Buf>),
}

impl<'a, Buf> std::ops::Deref for Operand<'a, Buf> {
    type Target = ArrayView<Buf>;

    fn deref(&self) -> &ArrayView<Buf> {
        match self {
            Operand::Borrowed(v) => v,
            Operand::Owned(v) => v,
        }
    }
}

/// Vectors only need a non-negative stride; the backend takes the stride
/// as-is otherwise.
pub(crate) fn vector<'a, B: BlasBackend>(
    backend: &B,
    v: &'a ArrayView<B::Buffer>,
    allow_copy: bool,
    name: &'static str,
) -> Result<Operand<'a, B::Buffer>, BlasError> {
    if v.strides[0] >= 0 {
        return Ok(Operand::Borrowed(v));
    }
    if !allow_copy {
        return Err(BlasError::CopyRequired(name));
    }
    log::trace!("materializing contiguous copy of vector operand {name}");
    let copy = backend.copy_strided(v, CopyOrder::Any)?;
    Ok(Operand::Owned(copy))
}

/// A 2D operand must occupy one unbroken segment; otherwise it is copied
/// column-major.
pub(crate) fn matrix<'a, B: BlasBackend>(
    backend: &B,
    v: &'a ArrayView<B::Buffer>,
    allow_copy: bool,
    name: &'static str,
) -> Result<Operand<'a, B::Buffer>, BlasError> {
    if layout::is_one_segment(v) {
        return Ok(Operand::Borrowed(v));
    }
    if !allow_copy {
        return Err(BlasError::CopyRequired(name));
    }
    log::trace!("materializing column-major copy of matrix operand {name}");
    let copy = backend.copy_strided(v, CopyOrder::ColMajor)?;
    Ok(Operand::Owned(copy))
}

/// A batched operand only needs contiguous per-item matrices; the batch
/// stride stays arbitrary. The replacement copy is row-major so the stack
/// layout is preserved while each item becomes contiguous.
pub(crate) fn batched<'a, B: BlasBackend>(
    backend: &B,
    v: &'a ArrayView<B::Buffer>,
    allow_copy: bool,
    name: &'static str,
) -> Result<(Operand<'a, B::Buffer>, MatrixClass), BlasError> {
    let elsize = v.dtype.size();
    let class = layout::classify_trailing_2d(&v.shape, &v.strides, elsize);
    if class.any() {
        return Ok((Operand::Borrowed(v), class));
    }
    if !allow_copy {
        return Err(BlasError::CopyRequired(name));
    }
    log::trace!("materializing row-major copy of batched operand {name}");
    let copy = backend.copy_strided(v, CopyOrder::RowMajor)?;
    let class = layout::classify_trailing_2d(&copy.shape, &copy.strides, elsize);
    Ok((Operand::Owned(copy), class))
}
