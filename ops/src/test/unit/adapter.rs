use crate::test::helpers::{iota, iota_in, values};
use crate::{ExecutorState, LayoutAdapter};
use tessera_device::{DeviceTensor, MemoryFormat};

#[test]
fn test_starts_uninitialized() {
    let adapter = LayoutAdapter::new();
    assert_eq!(adapter.state(), ExecutorState::Uninitialized);
    assert_eq!(adapter.reallocations(), 0);
    assert!(adapter.cached_dims().is_none());
    assert!(adapter.buffer().is_none());
}

#[test]
fn test_first_call_allocates() {
    let mut adapter = LayoutAdapter::new();
    let input = iota(&[2, 1, 3]);
    let buffer = adapter.normalize(&input).unwrap();

    assert!(buffer.layout().is_plain());
    assert_eq!(buffer.dims(), &[2, 1, 3]);
    assert!(!buffer.shares_storage_with(&input));
    assert_eq!(adapter.state(), ExecutorState::Warm);
    assert_eq!(adapter.reallocations(), 1);
    assert_eq!(adapter.cached_dims(), Some(&[2usize, 1, 3][..]));
}

#[test]
fn test_same_shape_reuses_buffer() {
    let mut adapter = LayoutAdapter::new();
    adapter.normalize(&iota(&[4, 1])).unwrap();
    let first = adapter.buffer().unwrap().storage().clone();

    adapter.normalize(&iota(&[4, 1])).unwrap();
    assert_eq!(adapter.reallocations(), 1);
    assert!(adapter.buffer().unwrap().storage().same_storage(&first));
}

#[test]
fn test_shape_change_reallocates() {
    let mut adapter = LayoutAdapter::new();
    adapter.normalize(&iota(&[4, 1])).unwrap();
    let first = adapter.buffer().unwrap().storage().clone();

    adapter.normalize(&iota(&[1, 4])).unwrap();
    assert_eq!(adapter.reallocations(), 2);
    assert_eq!(adapter.cached_dims(), Some(&[1usize, 4][..]));
    assert!(!adapter.buffer().unwrap().storage().same_storage(&first));
}

#[test]
fn test_blocked_input_normalized() {
    let mut adapter = LayoutAdapter::new();
    let input = iota_in(&[2, 5, 1], MemoryFormat::Blocked { block: 4 });
    let buffer = adapter.normalize(&input).unwrap();

    assert!(buffer.layout().is_plain());
    assert_eq!(values(buffer), (0..10).map(|i| i as f32).collect::<Vec<_>>());
}

#[test]
fn test_layout_switch_without_shape_change() {
    let mut adapter = LayoutAdapter::new();
    adapter.normalize(&iota(&[1, 3])).unwrap();

    let blocked = iota_in(&[1, 3], MemoryFormat::Blocked { block: 2 });
    let buffer = adapter.normalize(&blocked).unwrap();
    assert_eq!(values(buffer), vec![0.0, 1.0, 2.0]);
    assert_eq!(adapter.reallocations(), 1);
}

#[test]
fn test_data_refreshed_on_reuse() {
    let mut adapter = LayoutAdapter::new();
    adapter.normalize(&iota(&[3])).unwrap();

    let next = DeviceTensor::from_slice(&[3], &[5.0f32, 6.0, 7.0]).unwrap();
    let buffer = adapter.normalize(&next).unwrap();
    assert_eq!(values(buffer), vec![5.0, 6.0, 7.0]);
}
