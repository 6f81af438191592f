use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::allocator::{Allocator, CpuAllocator, LruAllocator};

/// Freed buffers kept per size class unless `TESSERA_ALLOCATOR_CACHE` says otherwise.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

static CPU: Lazy<Arc<dyn Allocator>> = Lazy::new(|| {
    let capacity = cache_capacity_from_env();
    tracing::debug!(capacity, "initializing CPU allocator");
    Arc::new(LruAllocator::with_capacity(Box::new(CpuAllocator), capacity))
});

/// Process-wide caching CPU allocator.
pub fn cpu() -> Arc<dyn Allocator> {
    Arc::clone(&CPU)
}

fn cache_capacity_from_env() -> usize {
    parse_cache_capacity(std::env::var("TESSERA_ALLOCATOR_CACHE").ok().as_deref())
}

pub(crate) fn parse_cache_capacity(value: Option<&str>) -> usize {
    match value.map(str::trim).map(str::parse::<usize>) {
        Some(Ok(capacity)) => capacity,
        Some(Err(_)) => {
            tracing::warn!(value = ?value, "ignoring malformed TESSERA_ALLOCATOR_CACHE");
            DEFAULT_CACHE_CAPACITY
        }
        None => DEFAULT_CACHE_CAPACITY,
    }
}
