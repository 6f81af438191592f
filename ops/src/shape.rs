use smallvec::SmallVec;

use crate::dims::DimensionSpec;
use crate::error::{Result, SqueezeDimensionNotOneSnafu};

/// Drop the axes named by `spec` from `dims`.
///
/// Every targeted axis must have extent 1. Axes beyond `dims.len()` are
/// ignored here; rank is validated by the caller.
pub fn compute_squeezed_dims(dims: &[usize], spec: &DimensionSpec) -> Result<SmallVec<[usize; 4]>> {
    let mut targets = spec.iter().peekable();
    let mut squeezed = SmallVec::with_capacity(dims.len().saturating_sub(spec.len()));

    for (axis, &size) in dims.iter().enumerate() {
        if targets.next_if_eq(&axis).is_some() {
            snafu::ensure!(size == 1, SqueezeDimensionNotOneSnafu { dim: axis, size });
            continue;
        }
        squeezed.push(size);
    }

    Ok(squeezed)
}
