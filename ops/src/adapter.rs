use std::sync::Arc;

use snafu::ResultExt;
use tessera_device::{DeviceTensor, Dims, Layout};

use crate::error::{DeviceSnafu, Result};

/// Lifecycle of an operator's conversion buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutorState {
    /// No input seen yet; nothing allocated.
    Uninitialized,
    /// A conversion buffer exists, sized for the last input seen.
    Warm,
}

#[derive(Debug)]
struct Conversion {
    last_seen: Dims,
    buffer: DeviceTensor,
}

/// Keeps a plain-layout copy of an operator's input.
///
/// The scratch buffer is reallocated only when the input shape changes
/// between invocations. Data is copied on every call so that the copy never
/// depends on the layout the input happened to arrive in.
#[derive(Debug, Default)]
pub struct LayoutAdapter {
    conversion: Option<Conversion>,
    reallocations: usize,
}

impl LayoutAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExecutorState {
        match self.conversion {
            None => ExecutorState::Uninitialized,
            Some(_) => ExecutorState::Warm,
        }
    }

    /// Shape of the most recently seen input.
    pub fn cached_dims(&self) -> Option<&[usize]> {
        self.conversion.as_ref().map(|c| c.last_seen.as_slice())
    }

    pub fn buffer(&self) -> Option<&DeviceTensor> {
        self.conversion.as_ref().map(|c| &c.buffer)
    }

    /// Number of times the conversion buffer has been (re)allocated.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Copy `input` into the plain-layout conversion buffer and return it.
    pub fn normalize(&mut self, input: &DeviceTensor) -> Result<&DeviceTensor> {
        let conversion = match self.conversion.take() {
            Some(conversion)
                if conversion.last_seen.as_slice() == input.dims() && conversion.buffer.dtype() == input.dtype() =>
            {
                tracing::trace!(dims = ?input.dims(), "reusing conversion buffer");
                conversion
            }
            previous => {
                tracing::debug!(
                    previous = ?previous.as_ref().map(|c| c.last_seen.as_slice()),
                    current = ?input.dims(),
                    "reallocating conversion buffer"
                );
                self.reallocations += 1;
                let layout = Layout::plain(input.dtype(), input.dims());
                let buffer = DeviceTensor::new(Arc::clone(input.storage().allocator()), layout);
                Conversion { last_seen: Dims::from_slice(input.dims()), buffer }
            }
        };

        let conversion = self.conversion.insert(conversion);
        conversion.buffer.copy_from(input).context(DeviceSnafu)?;
        Ok(&conversion.buffer)
    }
}
