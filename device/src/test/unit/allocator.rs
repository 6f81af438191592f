use crate::{Allocator, Buffer, BufferOptions, CpuAllocator, LruAllocator};
use std::sync::Arc;

fn lru() -> Arc<LruAllocator> {
    Arc::new(LruAllocator::new(Box::new(CpuAllocator)))
}

#[test]
fn test_lru_reuses_freed_buffer() {
    let allocator = lru();
    let buffer = Buffer::allocate(allocator.clone(), 64, BufferOptions::default()).unwrap();
    assert_eq!(allocator.cached(), 0);

    drop(buffer);
    assert_eq!(allocator.cached(), 1);

    let _again = Buffer::allocate(allocator.clone(), 64, BufferOptions::default()).unwrap();
    assert_eq!(allocator.cached(), 0);
}

#[test]
fn test_lru_keys_by_size() {
    let allocator = lru();
    drop(Buffer::allocate(allocator.clone(), 64, BufferOptions::default()).unwrap());

    let _other = Buffer::allocate(allocator.clone(), 32, BufferOptions::default()).unwrap();
    assert_eq!(allocator.cached(), 1);
}

#[test]
fn test_lru_zero_init_on_reuse() {
    let allocator = lru();
    let mut buffer = Buffer::allocate(allocator.clone(), 4, BufferOptions::default()).unwrap();
    buffer.copyin(&[9, 9, 9, 9]).unwrap();
    drop(buffer);

    let reused = Buffer::allocate(allocator.clone(), 4, BufferOptions { zero_init: true }).unwrap();
    let mut out = [1u8; 4];
    reused.copyout(&mut out).unwrap();
    assert_eq!(out, [0; 4]);
}

#[test]
fn test_lru_capacity_bound() {
    let allocator = Arc::new(LruAllocator::with_capacity(Box::new(CpuAllocator), 1));
    let first = Buffer::allocate(allocator.clone(), 8, BufferOptions::default()).unwrap();
    let second = Buffer::allocate(allocator.clone(), 8, BufferOptions::default()).unwrap();
    drop(first);
    drop(second);

    assert_eq!(allocator.cached(), 1);
}

#[test]
fn test_zero_capacity_keeps_no_entries() {
    let allocator = Arc::new(LruAllocator::with_capacity(Box::new(CpuAllocator), 0));
    for size in [8, 16, 24] {
        drop(Buffer::allocate(allocator.clone(), size, BufferOptions::default()).unwrap());
    }

    assert_eq!(allocator.cached(), 0);
    assert_eq!(allocator.cached_sizes(), 0);
}

#[test]
fn test_cached_sizes_drained_on_reuse() {
    let allocator = lru();
    drop(Buffer::allocate(allocator.clone(), 8, BufferOptions::default()).unwrap());
    drop(Buffer::allocate(allocator.clone(), 16, BufferOptions::default()).unwrap());
    assert_eq!(allocator.cached_sizes(), 2);

    let _reused = Buffer::allocate(allocator.clone(), 8, BufferOptions::default()).unwrap();
    assert_eq!(allocator.cached_sizes(), 1);
}

#[test]
fn test_unallocated_buffer_frees_nothing() {
    let allocator = lru();
    drop(Buffer::new(allocator.clone(), 16, BufferOptions::default()));
    assert_eq!(allocator.cached(), 0);
    assert_eq!(allocator.name(), "CPU");
}
