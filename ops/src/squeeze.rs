//! Squeeze over layout-tagged tensors.
//!
//! Inputs may arrive in a blocked format, which cannot be reshaped in place.
//! Each invocation therefore goes through a plain-layout conversion buffer
//! owned by the operator:
//!
//! 1. validate rank and compute the squeezed shape (no state touched yet);
//! 2. copy the input into the conversion buffer, reallocating it only when
//!    the input shape changed since the previous call;
//! 3. reset the output to the input's shape, alias it to the buffer and
//!    rewrite its dims to the squeezed shape.

use std::fmt;
use std::marker::PhantomData;

use snafu::ResultExt;
use tessera_device::{DeviceTensor, MemoryFormat};
use tessera_dtype::Element;

use crate::adapter::{ExecutorState, LayoutAdapter};
use crate::args::OperatorDef;
use crate::dims::DimensionSpec;
use crate::error::{DTypeMismatchSnafu, DeviceSnafu, LayoutMismatchSnafu, RankTooLowSnafu, Result};
use crate::shape::compute_squeezed_dims;

pub struct SqueezeOp<T: Element> {
    dims: DimensionSpec,
    adapter: LayoutAdapter,
    _element: PhantomData<fn() -> T>,
}

impl<T: Element> SqueezeOp<T> {
    pub const OP_TYPE: &'static str = "Squeeze";

    /// Build from an operator definition carrying a `dims` argument.
    pub fn new(def: &OperatorDef) -> Result<Self> {
        let dims = DimensionSpec::from_def(def)?;
        tracing::debug!(dims = ?dims.as_slice(), dtype = %T::DTYPE, "constructed squeeze operator");
        Ok(Self::with_dims(dims))
    }

    pub fn with_dims(dims: DimensionSpec) -> Self {
        Self { dims, adapter: LayoutAdapter::new(), _element: PhantomData }
    }

    pub fn dims(&self) -> &DimensionSpec {
        &self.dims
    }

    pub fn state(&self) -> ExecutorState {
        self.adapter.state()
    }

    pub fn reallocations(&self) -> usize {
        self.adapter.reallocations()
    }

    pub fn conversion_buffer(&self) -> Option<&DeviceTensor> {
        self.adapter.buffer()
    }

    /// Squeeze `input` into `output`.
    ///
    /// On success `output` aliases the conversion buffer and carries the
    /// squeezed dims. Shape errors are raised before any state changes.
    pub fn invoke(&mut self, input: &DeviceTensor, output: &mut DeviceTensor) -> Result<()> {
        snafu::ensure!(input.dtype() == T::DTYPE, DTypeMismatchSnafu { expected: T::DTYPE, actual: input.dtype() });

        let required = self.dims.min_rank();
        snafu::ensure!(input.rank() >= required, RankTooLowSnafu { required, actual: input.rank() });
        let new_dims = compute_squeezed_dims(input.dims(), &self.dims)?;

        let buffer = self.adapter.normalize(input)?;

        output.reset(T::DTYPE, input.dims(), MemoryFormat::Plain).context(DeviceSnafu)?;
        snafu::ensure!(
            output.layout().compatible(buffer.layout()),
            LayoutMismatchSnafu { output: output.layout().clone(), buffer: buffer.layout().clone() }
        );
        output.share_from(buffer).context(DeviceSnafu)?;
        output.reshape(&new_dims).context(DeviceSnafu)?;

        tracing::trace!(input = ?input.dims(), output = ?output.dims(), "squeezed");
        Ok(())
    }
}

impl<T: Element> fmt::Debug for SqueezeOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqueezeOp")
            .field("dtype", &T::DTYPE)
            .field("dims", &self.dims.as_slice())
            .field("adapter", &self.adapter)
            .finish()
    }
}
