//! Physical memory layouts.
//!
//! A [`Layout`] pairs a logical shape with a [`MemoryFormat`] describing how
//! elements are arranged in storage:
//! - `Plain`: dense row-major, the only format reshape-class operations accept.
//! - `Blocked`: the channel axis is tiled into fixed-size chunks stored
//!   innermost, the arrangement vectorized backends prefer.

use std::fmt;

use smallvec::{SmallVec, smallvec};
use tessera_dtype::DType;

use crate::error::{InvalidBlockSnafu, Result};

pub type Dims = SmallVec<[usize; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryFormat {
    #[default]
    Plain,
    /// Channel axis split into chunks of `block` elements, padded up to a multiple of `block`.
    Blocked { block: usize },
}

impl MemoryFormat {
    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

impl fmt::Display for MemoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Blocked { block } => write!(f, "blocked({block})"),
        }
    }
}

/// Layout descriptor: element type, logical dims and physical format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    dtype: DType,
    dims: Dims,
    format: MemoryFormat,
}

impl Layout {
    pub fn new(dtype: DType, dims: &[usize], format: MemoryFormat) -> Result<Self> {
        if let MemoryFormat::Blocked { block } = format {
            snafu::ensure!(block > 0, InvalidBlockSnafu { block });
        }
        Ok(Self { dtype, dims: Dims::from_slice(dims), format })
    }

    pub fn plain(dtype: DType, dims: &[usize]) -> Self {
        Self { dtype, dims: Dims::from_slice(dims), format: MemoryFormat::Plain }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn format(&self) -> MemoryFormat {
        self.format
    }

    pub fn is_plain(&self) -> bool {
        self.format.is_plain()
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Number of logical elements.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Whether storage laid out as `other` can be used in place of storage laid out as `self`.
    pub fn compatible(&self, other: &Layout) -> bool {
        self == other
    }

    /// Axis tiled by a blocked format, if any.
    fn blocked_axis(&self) -> Option<(usize, usize)> {
        match self.format {
            MemoryFormat::Blocked { block } if !self.dims.is_empty() => {
                Some((if self.dims.len() >= 2 { 1 } else { 0 }, block))
            }
            _ => None,
        }
    }

    /// Dims of the dense array actually held in storage.
    pub fn physical_dims(&self) -> Dims {
        match self.blocked_axis() {
            None => self.dims.clone(),
            Some((axis, block)) => {
                let mut dims = self.dims.clone();
                dims[axis] = dims[axis].div_ceil(block);
                dims.push(block);
                dims
            }
        }
    }

    /// Number of elements held in storage, padding included.
    pub fn physical_len(&self) -> usize {
        self.physical_dims().iter().product()
    }

    /// Storage size in bytes.
    pub fn nbytes(&self) -> usize {
        self.physical_len() * self.dtype.bytes()
    }

    /// Storage offset (in elements) of the element at a logical multi-index.
    pub fn physical_offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.dims.len());
        match self.blocked_axis() {
            None => row_major_offset(&self.dims, index),
            Some((axis, block)) => {
                let mut physical: Dims = Dims::from_slice(index);
                physical[axis] = index[axis] / block;
                physical.push(index[axis] % block);
                row_major_offset(&self.physical_dims(), &physical)
            }
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?} {}", self.dtype, self.dims.as_slice(), self.format)
    }
}

fn row_major_offset(dims: &[usize], index: &[usize]) -> usize {
    dims.iter().zip(index).fold(0, |offset, (&dim, &i)| offset * dim + i)
}

/// Visit every logical multi-index of `dims` in row-major order.
pub(crate) fn for_each_index(dims: &[usize], mut f: impl FnMut(&[usize])) {
    if dims.contains(&0) {
        return;
    }

    let mut index: Dims = smallvec![0; dims.len()];
    loop {
        f(&index);

        let mut axis = dims.len();
        loop {
            if axis == 0 {
                return;
            }
            axis -= 1;
            index[axis] += 1;
            if index[axis] < dims[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
}

/// Copy elements between two byte images of the same logical tensor, converting formats.
///
/// Both layouts must share dtype and dims. Padding in a blocked destination is zeroed.
pub(crate) fn reorder(src: &[u8], src_layout: &Layout, dst: &mut [u8], dst_layout: &Layout) {
    debug_assert_eq!(src_layout.dims, dst_layout.dims);
    debug_assert_eq!(src_layout.dtype, dst_layout.dtype);

    if src_layout.format == dst_layout.format {
        dst.copy_from_slice(src);
        return;
    }

    let elem = src_layout.dtype.bytes();
    if !dst_layout.is_plain() {
        dst.fill(0);
    }

    for_each_index(&src_layout.dims, |index| {
        let from = src_layout.physical_offset(index) * elem;
        let to = dst_layout.physical_offset(index) * elem;
        dst[to..to + elem].copy_from_slice(&src[from..from + elem]);
    });
}
