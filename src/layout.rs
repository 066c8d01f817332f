use crate::view::ArrayView;

/// Storage convention of a dense matrix as seen by the backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatrixOrder {
    RowMajor,
    ColMajor,
}

/// Per-operand transpose flag.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transpose {
    No,
    Trans,
}

impl Transpose {
    pub fn flipped(self) -> Transpose {
        match self {
            Transpose::No => Transpose::Trans,
            Transpose::Trans => Transpose::No,
        }
    }
}

/// Which contiguity conventions a matrix operand satisfies.
///
/// Dimensions of size 1 are wildcards, so both flags can be set at once.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MatrixClass {
    pub row_major: bool,
    pub col_major: bool,
}

impl MatrixClass {
    pub fn any(&self) -> bool {
        self.row_major || self.col_major
    }
}

/// Packed contiguity in one convention over the full rank.
///
/// Size-1 dimensions are skipped; their strides are irrelevant.
fn is_packed(shape: &[usize], strides: &[isize], elsize: usize, order: MatrixOrder) -> bool {
    if shape.contains(&0) {
        return true;
    }
    let mut expected = elsize as isize;
    let dims: Vec<usize> = match order {
        MatrixOrder::RowMajor => (0..shape.len()).rev().collect(),
        MatrixOrder::ColMajor => (0..shape.len()).collect(),
    };
    for i in dims {
        if shape[i] == 1 {
            continue;
        }
        if strides[i] != expected {
            return false;
        }
        expected *= shape[i] as isize;
    }
    true
}

/// Whether the view covers one unbroken memory segment, i.e. is packed in
/// either convention.
pub fn is_one_segment<B>(view: &ArrayView<B>) -> bool {
    let elsize = view.dtype.size();
    is_packed(&view.shape, &view.strides, elsize, MatrixOrder::RowMajor)
        || is_packed(&view.shape, &view.strides, elsize, MatrixOrder::ColMajor)
}

/// Classify a 2D operand's storage order.
pub fn classify_2d<B>(view: &ArrayView<B>) -> MatrixClass {
    let elsize = view.dtype.size();
    MatrixClass {
        row_major: is_packed(&view.shape, &view.strides, elsize, MatrixOrder::RowMajor),
        col_major: is_packed(&view.shape, &view.strides, elsize, MatrixOrder::ColMajor),
    }
}

/// Classify the trailing two dimensions of a batched operand.
///
/// The batch dimension's stride is unconstrained; per-item addressing uses
/// an explicit stride-based offset. The trailing dimensions only need a
/// packed minor axis, so a padded major-axis stride still classifies (it
/// becomes the leading dimension). Non-degenerate trailing dimensions must
/// have positive strides.
pub fn classify_trailing_2d(shape: &[usize], strides: &[isize], elsize: usize) -> MatrixClass {
    let n = shape.len();
    debug_assert!(n >= 2);
    let (r, c) = (n - 2, n - 1);
    let es = elsize as isize;
    if (shape[r] != 1 && strides[r] <= 0) || (shape[c] != 1 && strides[c] <= 0) {
        return MatrixClass::default();
    }
    MatrixClass {
        row_major: shape[c] == 1 || strides[c] == es,
        col_major: shape[r] == 1 || strides[r] == es,
    }
}
