use std::cell::RefCell;
use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::Result;

/// Opaque handle to host memory.
///
/// Uses `RefCell` for interior mutability with runtime borrow checking.
/// Safe for single-threaded use (Buffer is !Send + !Sync).
#[derive(Debug)]
pub struct RawBuffer {
    pub(crate) data: RefCell<Box<[u8]>>,
}

impl RawBuffer {
    /// Get the size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.data.borrow().len()
    }
}

/// Options for buffer allocation.
#[derive(Debug, Clone, Default)]
pub struct BufferOptions {
    /// Whether to zero-initialize the buffer.
    pub zero_init: bool,
}

pub trait Allocator: Send + Sync + std::fmt::Debug {
    fn alloc(&self, size: usize, options: &BufferOptions) -> Result<RawBuffer>;
    fn free(&self, _buffer: RawBuffer) {}
    fn name(&self) -> &str;
}

/// CPU allocator using system memory.
#[derive(Debug, Clone)]
pub struct CpuAllocator;

impl Allocator for CpuAllocator {
    fn alloc(&self, size: usize, _options: &BufferOptions) -> Result<RawBuffer> {
        let data = vec![0u8; size].into_boxed_slice();
        Ok(RawBuffer { data: RefCell::new(data) })
    }

    fn name(&self) -> &str {
        "CPU"
    }
}

/// LRU allocator that caches freed buffers for reuse.
///
/// Reallocating a conversion buffer of a size seen before hands back the
/// storage released by the previous owner instead of going to the system.
#[derive(Debug)]
pub struct LruAllocator {
    inner: Box<dyn Allocator>,
    cache: Mutex<HashMap<usize, Vec<RawBuffer>>>,
    max_buffers_per_size: usize,
    name: String,
}

impl LruAllocator {
    pub fn new(inner: Box<dyn Allocator>) -> Self {
        Self::with_capacity(inner, 32)
    }

    pub fn with_capacity(inner: Box<dyn Allocator>, max_buffers_per_size: usize) -> Self {
        let name = inner.name().to_string();
        Self { inner, cache: Mutex::new(HashMap::new()), max_buffers_per_size, name }
    }

    /// Number of freed buffers currently held for reuse.
    pub fn cached(&self) -> usize {
        self.cache.lock().values().map(Vec::len).sum()
    }

    /// Number of distinct sizes with at least one cached buffer.
    pub fn cached_sizes(&self) -> usize {
        self.cache.lock().len()
    }
}

impl Allocator for LruAllocator {
    fn alloc(&self, size: usize, options: &BufferOptions) -> Result<RawBuffer> {
        {
            let mut cache = self.cache.lock();
            if let Some(buffers) = cache.get_mut(&size)
                && let Some(buffer) = buffers.pop()
            {
                if buffers.is_empty() {
                    cache.remove(&size);
                }
                if options.zero_init {
                    buffer.data.borrow_mut().fill(0);
                }
                tracing::trace!(size, "reusing cached allocation");
                return Ok(buffer);
            }
        } // Drop lock before expensive allocation

        self.inner.alloc(size, options)
    }

    fn free(&self, buffer: RawBuffer) {
        let mut cache = self.cache.lock();
        let size = buffer.size();
        let held = cache.get(&size).map_or(0, Vec::len);
        if held < self.max_buffers_per_size {
            cache.entry(size).or_default().push(buffer);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
