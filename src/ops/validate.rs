use crate::dtype::FloatDType;
use crate::layout::Transpose;
use crate::ops::BlasError;
use crate::view::ArrayView;

/// The first operand's dtype must be one the backend kernels exist for.
pub(crate) fn blas_dtype<B>(v: &ArrayView<B>) -> Result<FloatDType, BlasError> {
    FloatDType::of(v.dtype).ok_or(BlasError::InvalidDType(v.dtype))
}

pub(crate) fn rank<B>(
    name: &'static str,
    v: &ArrayView<B>,
    expected: usize,
) -> Result<(), BlasError> {
    if v.rank() != expected {
        return Err(BlasError::RankMismatch {
            operand: name,
            actual: v.rank(),
            expected,
        });
    }
    Ok(())
}

/// All operands must agree with the first operand's dtype.
pub(crate) fn same_dtype<B>(
    first: &ArrayView<B>,
    rest: &[&ArrayView<B>],
) -> Result<(), BlasError> {
    for v in rest {
        if v.dtype != first.dtype {
            return Err(BlasError::DTypeMismatch(first.dtype, v.dtype));
        }
    }
    Ok(())
}

pub(crate) fn aligned<B>(views: &[(&'static str, &ArrayView<B>)]) -> Result<(), BlasError> {
    for (name, v) in views {
        if !v.aligned {
            return Err(BlasError::UnalignedOperand(name));
        }
    }
    Ok(())
}

/// Logical dimensions of `op(A)` given A's stored dimensions.
pub(crate) fn trans_dims(trans: Transpose, d0: usize, d1: usize) -> (usize, usize) {
    match trans {
        Transpose::No => (d0, d1),
        Transpose::Trans => (d1, d0),
    }
}
