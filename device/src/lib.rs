//! Layout-aware tensor storage.
//!
//! This crate is the memory side of tessera operators: allocators, lazily
//! allocated shareable buffers, layout descriptors and [`DeviceTensor`],
//! which bundles the three and provides the reset / copy / compare / share /
//! reshape primitives operators are written against.

pub mod allocator;
pub mod buffer;
pub mod error;
pub mod layout;
pub mod registry;
pub mod tensor;

pub use allocator::{Allocator, BufferOptions, CpuAllocator, LruAllocator};
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use layout::{Dims, Layout, MemoryFormat};
pub use registry::cpu;
pub use tensor::DeviceTensor;

#[cfg(test)]
mod test;
