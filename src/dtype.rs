use half::{bf16, f16};

/// Runtime element-type tag carried by every array view.
///
/// Only the floating-point subset in [`FloatDType`] is accepted by the BLAS
/// entry points; the wider enumeration exists so views of other element
/// types can be rejected with a proper error instead of being
/// unrepresentable.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum DType {
    F64,
    F32,
    BF16,
    F16,
    I64,
    I32,
    U32,
    U8,
}

impl DType {
    pub fn size(&self) -> usize {
        match self {
            DType::F64 => 8,
            DType::F32 => 4,
            DType::BF16 => 2,
            DType::F16 => 2,
            DType::I64 => 8,
            DType::I32 => 4,
            DType::U32 => 4,
            DType::U8 => 1,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::F64 => write!(f, "Float64"),
            DType::F32 => write!(f, "Float32"),
            DType::BF16 => write!(f, "BFloat16"),
            DType::F16 => write!(f, "Float16"),
            DType::I64 => write!(f, "Int64"),
            DType::I32 => write!(f, "Int32"),
            DType::U32 => write!(f, "UInt32"),
            DType::U8 => write!(f, "UInt8"),
        }
    }
}

/// The element types the BLAS backend routines are specialized for.
///
/// Produced by the operand validator; once a call holds a `FloatDType` the
/// per-dtype dispatch in the call adapter is exhaustive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FloatDType {
    F16,
    F32,
    F64,
}

impl FloatDType {
    pub fn of(dtype: DType) -> Option<FloatDType> {
        match dtype {
            DType::F16 => Some(FloatDType::F16),
            DType::F32 => Some(FloatDType::F32),
            DType::F64 => Some(FloatDType::F64),
            _ => None,
        }
    }

    pub fn size(&self) -> usize {
        DType::from(*self).size()
    }
}

impl From<FloatDType> for DType {
    fn from(dtype: FloatDType) -> Self {
        match dtype {
            FloatDType::F16 => DType::F16,
            FloatDType::F32 => DType::F32,
            FloatDType::F64 => DType::F64,
        }
    }
}

pub trait DTypeOfPrimitive {
    const DTYPE: DType;
}

impl DTypeOfPrimitive for f64 { const DTYPE: DType = DType::F64; }
impl DTypeOfPrimitive for f32 { const DTYPE: DType = DType::F32; }
impl DTypeOfPrimitive for bf16 { const DTYPE: DType = DType::BF16; }
impl DTypeOfPrimitive for f16 { const DTYPE: DType = DType::F16; }
impl DTypeOfPrimitive for i64 { const DTYPE: DType = DType::I64; }
impl DTypeOfPrimitive for i32 { const DTYPE: DType = DType::I32; }
impl DTypeOfPrimitive for u32 { const DTYPE: DType = DType::U32; }
impl DTypeOfPrimitive for u8 { const DTYPE: DType = DType::U8; }
