use snafu::Snafu;
use tessera_dtype::DType;

use crate::layout::Layout;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("size mismatch: expected {expected} bytes, got {actual}"))]
    SizeMismatch { expected: usize, actual: usize },

    /// Invalid buffer view parameters.
    #[snafu(display("invalid view: offset {offset} + size {size} exceeds buffer size {buffer_size}"))]
    InvalidView { offset: usize, size: usize, buffer_size: usize },

    /// Logical shapes of two tensors disagree.
    #[snafu(display("shape mismatch: expected {expected:?}, got {actual:?}"))]
    ShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },

    #[snafu(display("dtype mismatch: expected {expected}, got {actual}"))]
    DTypeMismatch { expected: DType, actual: DType },

    /// Storage can only be shared between tensors with identical layouts.
    #[snafu(display("layout mismatch: expected {expected}, got {actual}"))]
    LayoutMismatch { expected: Layout, actual: Layout },

    #[snafu(display("block size must be positive, got {block}"))]
    InvalidBlock { block: usize },

    #[snafu(display("cannot reshape {layout}: only plain layouts can be reshaped"))]
    ReshapeRequiresPlain { layout: Layout },

    #[snafu(display("reshape must preserve element count: expected {expected}, got {actual}"))]
    ElementCountMismatch { expected: usize, actual: usize },
}
