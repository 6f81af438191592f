use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use crate::allocator::{Allocator, BufferOptions, RawBuffer};
use crate::error::{InvalidViewSnafu, Result, SizeMismatchSnafu};

/// Shared buffer data that can be referenced by multiple views.
#[derive(Debug)]
struct BufferData {
    /// Lazily-initialized raw buffer.
    raw: OnceLock<RawBuffer>,
    allocator: Arc<dyn Allocator>,
    /// Total size of the underlying allocation in bytes.
    total_size: usize,
    options: BufferOptions,
}

impl BufferData {
    fn new(allocator: Arc<dyn Allocator>, size: usize, options: BufferOptions) -> Self {
        Self { raw: OnceLock::new(), allocator, total_size: size, options }
    }

    /// Get the raw buffer, allocating it on first access.
    fn raw(&self) -> Result<&RawBuffer> {
        if let Some(raw) = self.raw.get() {
            return Ok(raw);
        }

        let raw = self.allocator.alloc(self.total_size, &self.options)?;
        Ok(self.raw.get_or_init(|| raw))
    }

    fn is_allocated(&self) -> bool {
        self.raw.get().is_some()
    }
}

impl Drop for BufferData {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.allocator.free(raw);
        }
    }
}

/// A host buffer that may be a view into, or an alias of, another buffer.
///
/// Cloning a `Buffer` aliases the storage: both handles observe the same
/// bytes and the allocation is released when the last handle is dropped.
/// The type is `!Send + !Sync`; operators owning buffers run single-threaded.
#[derive(Debug, Clone)]
pub struct Buffer {
    data: Rc<BufferData>,
    /// Offset into the base buffer (in bytes).
    offset: usize,
    /// Size of this view (in bytes).
    size: usize,
}

impl Buffer {
    /// Create a new buffer with lazy allocation.
    pub fn new(allocator: Arc<dyn Allocator>, size: usize, options: BufferOptions) -> Self {
        Self { data: Rc::new(BufferData::new(allocator, size, options)), offset: 0, size }
    }

    /// Create a new buffer with immediate allocation.
    pub fn allocate(allocator: Arc<dyn Allocator>, size: usize, options: BufferOptions) -> Result<Self> {
        let buffer = Self::new(allocator, size, options);
        buffer.ensure_allocated()?;
        Ok(buffer)
    }

    /// Create a view into this buffer.
    pub fn view(&self, offset: usize, size: usize) -> Result<Self> {
        if offset + size > self.size {
            return InvalidViewSnafu { offset, size, buffer_size: self.size }.fail();
        }

        Ok(Self { data: Rc::clone(&self.data), offset: self.offset + offset, size })
    }

    /// Ensure the underlying buffer is allocated.
    pub fn ensure_allocated(&self) -> Result<()> {
        self.data.raw().map(|_| ())
    }

    pub fn is_allocated(&self) -> bool {
        self.data.is_allocated()
    }

    /// Get the size of this buffer view in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the offset of this view in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn allocator(&self) -> &Arc<dyn Allocator> {
        &self.data.allocator
    }

    /// Whether both handles refer to the same underlying allocation.
    pub fn same_storage(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Number of live handles (views and aliases) to the underlying allocation.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.data)
    }

    /// Copy data from host memory into this buffer.
    pub fn copyin(&mut self, src: &[u8]) -> Result<()> {
        let expected = self.size;
        let actual = src.len();
        snafu::ensure!(expected == actual, SizeMismatchSnafu { expected, actual });

        let mut data = self.data.raw()?.data.borrow_mut();
        data[self.offset..self.offset + self.size].copy_from_slice(src);
        Ok(())
    }

    /// Copy data from this buffer to host memory.
    pub fn copyout(&self, dst: &mut [u8]) -> Result<()> {
        let expected = self.size;
        let actual = dst.len();
        snafu::ensure!(expected == actual, SizeMismatchSnafu { expected, actual });

        let data = self.data.raw()?.data.borrow();
        dst.copy_from_slice(&data[self.offset..self.offset + self.size]);
        Ok(())
    }

    /// Copy data from another buffer to this buffer.
    pub fn copy_from(&mut self, src: &Buffer) -> Result<()> {
        let expected = self.size;
        let actual = src.size;
        snafu::ensure!(expected == actual, SizeMismatchSnafu { expected, actual });

        if self.same_storage(src) {
            // Aliased views share one RefCell; copy within a single borrow.
            let mut data = self.data.raw()?.data.borrow_mut();
            data.copy_within(src.offset..src.offset + src.size, self.offset);
            return Ok(());
        }

        let mut dst_data = self.data.raw()?.data.borrow_mut();
        let src_data = src.data.raw()?.data.borrow();
        dst_data[self.offset..self.offset + self.size].copy_from_slice(&src_data[src.offset..src.offset + src.size]);
        Ok(())
    }
}
