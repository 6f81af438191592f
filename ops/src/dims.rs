use smallvec::SmallVec;
use snafu::OptionExt;

use crate::args::OperatorDef;
use crate::error::{DimensionOutOfRangeSnafu, EmptyDimensionsSnafu, NegativeDimensionSnafu, Result};

/// Validated set of axes to remove: non-empty, ascending, deduplicated, non-negative.
///
/// Built once per operator instance and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSpec {
    dims: SmallVec<[usize; 4]>,
    duplicates: usize,
}

impl DimensionSpec {
    pub const ARGUMENT: &'static str = "dims";

    /// Normalize a raw dimension list.
    ///
    /// Repeated entries are dropped with a warning; an empty list or a
    /// negative entry is rejected.
    pub fn new(raw: &[i64]) -> Result<Self> {
        snafu::ensure!(!raw.is_empty(), EmptyDimensionsSnafu);

        let mut sorted = raw.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let duplicates = raw.len() - sorted.len();
        if duplicates > 0 {
            tracing::warn!(dims = ?raw, duplicates, "parameter `dims` has repeated dimensions");
        }

        if let Some(&dim) = sorted.first() {
            snafu::ensure!(dim >= 0, NegativeDimensionSnafu { dim });
        }

        let dims = sorted
            .into_iter()
            .map(|dim| usize::try_from(dim).ok().context(DimensionOutOfRangeSnafu { dim }))
            .collect::<Result<_>>()?;
        Ok(Self { dims, duplicates })
    }

    /// Read the `dims` argument of an operator definition.
    pub fn from_def(def: &OperatorDef) -> Result<Self> {
        Self::new(&def.repeated_arg::<i64>(Self::ARGUMENT)?)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.dims
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dims.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Largest axis index.
    pub fn max(&self) -> usize {
        self.dims[self.dims.len() - 1]
    }

    /// Smallest input rank these dims can be applied to.
    pub fn min_rank(&self) -> usize {
        self.max() + 1
    }

    pub fn contains(&self, dim: usize) -> bool {
        self.dims.binary_search(&dim).is_ok()
    }

    /// How many repeated entries were dropped during normalization.
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates
    }
}
