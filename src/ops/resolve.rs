use crate::layout::{self, MatrixClass, MatrixOrder, Transpose};
use crate::ops::BlasError;
use crate::view::ArrayView;

/// A matrix operand expressed in the call's order convention.
pub(crate) struct ResolvedMatrix {
    pub trans: Transpose,
    pub ld: usize,
}

/// Pick the call order from a 2D result operand's own contiguity.
/// Column-major wins when a degenerate shape satisfies both.
pub(crate) fn order_from_2d<B>(
    v: &ArrayView<B>,
    name: &'static str,
) -> Result<(MatrixOrder, usize), BlasError> {
    let class = layout::classify_2d(v);
    if class.col_major {
        Ok((MatrixOrder::ColMajor, v.shape[0]))
    } else if class.row_major {
        Ok((MatrixOrder::RowMajor, v.shape[1]))
    } else {
        Err(BlasError::UnsupportedLayout(name))
    }
}

/// Express a 2D operand in the chosen order. An operand stored in the
/// opposite convention gets its transpose flag flipped instead of being
/// moved; its leading dimension is always the stored dimension along the
/// packed axis.
pub(crate) fn matrix_in_order<B>(
    v: &ArrayView<B>,
    order: MatrixOrder,
    trans: Transpose,
    name: &'static str,
) -> Result<ResolvedMatrix, BlasError> {
    let class = layout::classify_2d(v);
    if class.col_major {
        let trans = match order {
            MatrixOrder::ColMajor => trans,
            MatrixOrder::RowMajor => trans.flipped(),
        };
        Ok(ResolvedMatrix {
            trans,
            ld: v.shape[0],
        })
    } else if class.row_major {
        let trans = match order {
            MatrixOrder::RowMajor => trans,
            MatrixOrder::ColMajor => trans.flipped(),
        };
        Ok(ResolvedMatrix {
            trans,
            ld: v.shape[1],
        })
    } else {
        Err(BlasError::UnsupportedLayout(name))
    }
}

/// Leading dimension of a batched operand's per-item matrices, taken from
/// the stride of the non-packed trailing axis. A degenerate non-packed
/// axis carries no meaningful stride, so the packed dimension size stands
/// in for it.
fn batched_ld<B>(v: &ArrayView<B>, order: MatrixOrder, elsize: usize) -> usize {
    let n = v.rank();
    let (r, c) = (n - 2, n - 1);
    let es = elsize as isize;
    match order {
        MatrixOrder::ColMajor => {
            if v.shape[c] > 1 {
                (v.strides[c] / es) as usize
            } else {
                v.shape[r]
            }
        }
        MatrixOrder::RowMajor => {
            if v.shape[r] > 1 {
                (v.strides[r] / es) as usize
            } else {
                v.shape[c]
            }
        }
    }
}

/// Pick the call order from a batched result operand's per-item contiguity.
pub(crate) fn order_from_batched<B>(
    v: &ArrayView<B>,
    class: MatrixClass,
    elsize: usize,
    name: &'static str,
) -> Result<(MatrixOrder, usize), BlasError> {
    if class.col_major {
        Ok((MatrixOrder::ColMajor, batched_ld(v, MatrixOrder::ColMajor, elsize)))
    } else if class.row_major {
        Ok((MatrixOrder::RowMajor, batched_ld(v, MatrixOrder::RowMajor, elsize)))
    } else {
        Err(BlasError::UnsupportedLayout(name))
    }
}

/// Express a batched operand's per-item matrices in the chosen order.
pub(crate) fn batched_in_order<B>(
    v: &ArrayView<B>,
    class: MatrixClass,
    order: MatrixOrder,
    trans: Transpose,
    elsize: usize,
    name: &'static str,
) -> Result<ResolvedMatrix, BlasError> {
    if class.col_major {
        let trans = match order {
            MatrixOrder::ColMajor => trans,
            MatrixOrder::RowMajor => trans.flipped(),
        };
        Ok(ResolvedMatrix {
            trans,
            ld: batched_ld(v, MatrixOrder::ColMajor, elsize),
        })
    } else if class.row_major {
        let trans = match order {
            MatrixOrder::RowMajor => trans,
            MatrixOrder::ColMajor => trans.flipped(),
        };
        Ok(ResolvedMatrix {
            trans,
            ld: batched_ld(v, MatrixOrder::RowMajor, elsize),
        })
    } else {
        Err(BlasError::UnsupportedLayout(name))
    }
}
