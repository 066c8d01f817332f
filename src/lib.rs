//! Dispatch layer mapping strided multi-dimensional array operations onto
//! a dense linear-algebra backend.
//!
//! The backend only consumes dense, contiguous matrices in a fixed
//! row/column-major convention, so the work here is layout negotiation:
//! deciding per operand whether its strided view can be consumed directly,
//! whether a transpose flag flip stands in for a copy, whether a temporary
//! contiguous copy must be materialized, and — for batched operations —
//! whether the native batched entry point applies or the call must be
//! decomposed into per-item dispatches. The arithmetic itself is entirely
//! the backend's.

pub mod backend;
pub mod backends;
pub mod dtype;
pub mod layout;
pub mod ops;
pub mod view;

pub use backend::{BackendStatus, BlasBackend, BlasScalar, CopyOrder};
pub use dtype::{DType, DTypeOfPrimitive, FloatDType};
pub use layout::{MatrixOrder, Transpose};
pub use ops::{BlasDispatcher, BlasError};
pub use view::ArrayView;
