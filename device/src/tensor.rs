use std::sync::Arc;

use tessera_dtype::{DType, Element};

use crate::allocator::{Allocator, BufferOptions};
use crate::buffer::Buffer;
use crate::error::{
    DTypeMismatchSnafu, ElementCountMismatchSnafu, LayoutMismatchSnafu, ReshapeRequiresPlainSnafu, Result,
    ShapeMismatchSnafu, SizeMismatchSnafu,
};
use crate::layout::{Layout, MemoryFormat, reorder};
use crate::registry;

/// A tensor bound to storage with an explicit physical layout.
///
/// Storage is either owned exclusively or aliased with another tensor via
/// [`DeviceTensor::share_from`]. Shape changes through [`DeviceTensor::reshape`]
/// touch metadata only.
#[derive(Debug)]
pub struct DeviceTensor {
    layout: Layout,
    storage: Buffer,
}

impl DeviceTensor {
    /// Create a tensor whose storage is allocated on first access.
    pub fn new(allocator: Arc<dyn Allocator>, layout: Layout) -> Self {
        let storage = Buffer::new(allocator, layout.nbytes(), BufferOptions::default());
        Self { layout, storage }
    }

    /// An empty plain tensor, typically bound to an operator output slot before the first run.
    pub fn empty(dtype: DType) -> Self {
        Self::new(registry::cpu(), Layout::plain(dtype, &[0]))
    }

    /// Create a plain tensor holding `data` in row-major order.
    pub fn from_slice<T: Element>(dims: &[usize], data: &[T]) -> Result<Self> {
        let layout = Layout::plain(T::DTYPE, dims);
        let expected = layout.numel();
        let actual = data.len();
        snafu::ensure!(expected == actual, ElementCountMismatchSnafu { expected, actual });

        let mut storage = Buffer::new(registry::cpu(), layout.nbytes(), BufferOptions::default());
        storage.copyin(bytemuck::cast_slice(data))?;
        Ok(Self { layout, storage })
    }

    /// Read the elements in row-major logical order, whatever the physical format.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let expected = T::DTYPE;
        let actual = self.dtype();
        snafu::ensure!(expected == actual, DTypeMismatchSnafu { expected, actual });

        let mut bytes = vec![0u8; self.storage.size()];
        self.storage.copyout(&mut bytes)?;

        if self.layout.is_plain() {
            return Ok(bytemuck::pod_collect_to_vec(bytes.as_slice()));
        }

        let plain = Layout::plain(self.dtype(), self.dims());
        let mut plain_bytes = vec![0u8; plain.nbytes()];
        reorder(&bytes, &self.layout, &mut plain_bytes, &plain);
        Ok(bytemuck::pod_collect_to_vec(plain_bytes.as_slice()))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn dims(&self) -> &[usize] {
        self.layout.dims()
    }

    pub fn dtype(&self) -> DType {
        self.layout.dtype()
    }

    pub fn format(&self) -> MemoryFormat {
        self.layout.format()
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn numel(&self) -> usize {
        self.layout.numel()
    }

    pub fn storage(&self) -> &Buffer {
        &self.storage
    }

    pub fn is_allocated(&self) -> bool {
        self.storage.is_allocated()
    }

    pub fn shares_storage_with(&self, other: &DeviceTensor) -> bool {
        self.storage.same_storage(&other.storage)
    }

    /// Replace the layout and detach from the current storage.
    ///
    /// The new storage is allocated lazily from the same allocator. Tensors
    /// that aliased the old storage keep it alive and are unaffected.
    pub fn reset(&mut self, dtype: DType, dims: &[usize], format: MemoryFormat) -> Result<()> {
        let layout = Layout::new(dtype, dims, format)?;
        let allocator = Arc::clone(self.storage.allocator());
        self.storage = Buffer::new(allocator, layout.nbytes(), BufferOptions::default());
        self.layout = layout;
        Ok(())
    }

    /// Copy `src`'s elements into this tensor's storage, converting into this tensor's format.
    pub fn copy_from(&mut self, src: &DeviceTensor) -> Result<()> {
        snafu::ensure!(
            self.dims() == src.dims(),
            ShapeMismatchSnafu { expected: self.dims().to_vec(), actual: src.dims().to_vec() }
        );
        snafu::ensure!(self.dtype() == src.dtype(), DTypeMismatchSnafu { expected: self.dtype(), actual: src.dtype() });

        if self.layout.format() == src.layout.format() {
            return self.storage.copy_from(&src.storage);
        }

        let mut src_bytes = vec![0u8; src.storage.size()];
        src.storage.copyout(&mut src_bytes)?;

        let expected = self.layout.nbytes();
        let actual = self.storage.size();
        snafu::ensure!(expected == actual, SizeMismatchSnafu { expected, actual });

        let mut dst_bytes = vec![0u8; expected];
        reorder(&src_bytes, &src.layout, &mut dst_bytes, &self.layout);
        self.storage.copyin(&dst_bytes)
    }

    /// Alias `src`'s storage. Both tensors must agree on layout.
    pub fn share_from(&mut self, src: &DeviceTensor) -> Result<()> {
        snafu::ensure!(
            self.layout.compatible(&src.layout),
            LayoutMismatchSnafu { expected: src.layout.clone(), actual: self.layout.clone() }
        );
        self.storage = src.storage.clone();
        Ok(())
    }

    /// Rewrite the logical dims without touching storage.
    pub fn reshape(&mut self, dims: &[usize]) -> Result<()> {
        snafu::ensure!(self.layout.is_plain(), ReshapeRequiresPlainSnafu { layout: self.layout.clone() });

        let expected = self.numel();
        let actual = dims.iter().product::<usize>();
        snafu::ensure!(expected == actual, ElementCountMismatchSnafu { expected, actual });

        self.layout = Layout::plain(self.dtype(), dims);
        Ok(())
    }

    /// Produce a copy of this tensor stored in `format`.
    pub fn reorder(&self, format: MemoryFormat) -> Result<DeviceTensor> {
        let layout = Layout::new(self.dtype(), self.dims(), format)?;
        let mut converted = DeviceTensor::new(Arc::clone(self.storage.allocator()), layout);
        converted.copy_from(self)?;
        Ok(converted)
    }
}
