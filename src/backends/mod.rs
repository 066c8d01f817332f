pub mod host;

pub use host::{HostBackend, HostBuffer};
