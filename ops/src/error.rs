use snafu::Snafu;
use tessera_device::Layout;
use tessera_dtype::DType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("parameter `dims` must be provided"))]
    EmptyDimensions,

    #[snafu(display("dimension ids must be non-negative, got {dim}"))]
    NegativeDimension { dim: i64 },

    #[snafu(display("dimension id {dim} does not fit in a platform index"))]
    DimensionOutOfRange { dim: i64 },

    #[snafu(display("argument `{name}` holds {actual}, expected {expected}"))]
    ArgumentType { name: String, expected: &'static str, actual: &'static str },

    #[snafu(display("no operator `{op_type}` registered for {dtype}"))]
    UnknownOperator { op_type: String, dtype: DType },

    #[snafu(display("input needs at least {required} dimensions, got {actual}"))]
    RankTooLow { required: usize, actual: usize },

    #[snafu(display("cannot squeeze dimension {dim}: size is {size}, not 1"))]
    SqueezeDimensionNotOne { dim: usize, size: usize },

    #[snafu(display("output layout {output} does not match conversion buffer layout {buffer}"))]
    LayoutMismatch { output: Layout, buffer: Layout },

    #[snafu(display("{op_type} expects {expected} {slot}(s), got {actual}"))]
    SlotCount { op_type: &'static str, slot: &'static str, expected: usize, actual: usize },

    #[snafu(display("input dtype {actual} does not match operator dtype {expected}"))]
    DTypeMismatch { expected: DType, actual: DType },

    #[snafu(display("layout engine error: {source}"))]
    Device { source: tessera_device::Error },
}

/// Coarse error categories callers dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed operator configuration; no operator instance is created.
    Config,
    /// Input shape incompatible with the configured dimensions.
    Shape,
    /// Output and conversion buffer disagree on layout.
    LayoutMismatch,
    /// Wrong number or type of bound tensors.
    Binding,
    /// Failure reported by the layout engine itself.
    Device,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyDimensions | Self::NegativeDimension { .. } | Self::DimensionOutOfRange { .. } => ErrorKind::Config,
            Self::ArgumentType { .. } => ErrorKind::Config,
            Self::UnknownOperator { .. } => ErrorKind::Config,
            Self::RankTooLow { .. } | Self::SqueezeDimensionNotOne { .. } => ErrorKind::Shape,
            Self::LayoutMismatch { .. } => ErrorKind::LayoutMismatch,
            Self::SlotCount { .. } | Self::DTypeMismatch { .. } => ErrorKind::Binding,
            Self::Device { .. } => ErrorKind::Device,
        }
    }
}
