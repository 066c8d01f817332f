use crate::dtype::DType;

/// Non-owning descriptor of a strided numeric buffer.
///
/// `buffer` is a cheaply clonable handle to device-resident storage; clones
/// alias the same allocation and the storage is released when the last
/// handle drops. `strides` are in bytes and may be negative or zero.
/// `offset` is the byte offset of the view's first element.
#[derive(Debug, Clone)]
pub struct ArrayView<B> {
    pub buffer: B,
    pub offset: usize,
    pub shape: Vec<usize>,
    pub strides: Vec<isize>,
    pub dtype: DType,
    pub aligned: bool,
}

impl<B> ArrayView<B> {
    pub fn new(
        buffer: B,
        dtype: DType,
        shape: Vec<usize>,
        strides: Vec<isize>,
        offset: usize,
    ) -> Self {
        assert_eq!(shape.len(), strides.len());
        ArrayView {
            buffer,
            offset,
            shape,
            strides,
            dtype,
            aligned: true,
        }
    }

    /// A packed row-major view covering a whole buffer.
    pub fn contiguous(buffer: B, dtype: DType, shape: &[usize]) -> Self {
        let strides = packed_row_major_strides(shape, dtype.size());
        Self::new(buffer, dtype, shape.to_vec(), strides, 0)
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

/// Byte strides of a packed row-major array of the given shape.
pub fn packed_row_major_strides(shape: &[usize], elsize: usize) -> Vec<isize> {
    let mut strides = vec![];
    let mut v = elsize as isize;
    for &d in shape.iter().rev() {
        strides.push(v);
        v *= d as isize;
    }
    strides.reverse();
    strides
}

/// Byte strides of a packed column-major array of the given shape.
pub fn packed_col_major_strides(shape: &[usize], elsize: usize) -> Vec<isize> {
    let mut strides = vec![];
    let mut v = elsize as isize;
    for &d in shape.iter() {
        strides.push(v);
        v *= d as isize;
    }
    strides
}
