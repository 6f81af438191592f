use crate::error::Error;
use crate::test::helpers::{iota, output, squeeze_def, values};
use crate::{ErrorKind, OperatorDef, OperatorRegistry};
use tessera_dtype::DType;
use test_case::test_case;

#[test_case(DType::Float32; "f32")]
#[test_case(DType::Float64; "f64")]
#[test_case(DType::Int32; "i32")]
#[test_case(DType::Int64; "i64")]
fn test_defaults_register_squeeze(dtype: DType) {
    assert!(OperatorRegistry::with_defaults().contains("Squeeze", dtype));
}

#[test]
fn test_empty_registry() {
    let registry = OperatorRegistry::new();
    assert!(!registry.contains("Squeeze", DType::Float32));
    assert!(!OperatorRegistry::with_defaults().contains("Squeeze", DType::Float16));
}

#[test]
fn test_create_and_run() {
    let registry = OperatorRegistry::with_defaults();
    let mut op = registry.create(&squeeze_def(&[0]), DType::Float32).unwrap();
    assert_eq!(op.op_type(), "Squeeze");

    let input = iota(&[1, 3]);
    let mut outputs = vec![output()];
    op.run(&[&input], &mut outputs).unwrap();
    op.run(&[&input], &mut outputs).unwrap();

    assert_eq!(outputs[0].dims(), &[3]);
    assert_eq!(values(&outputs[0]), vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_unknown_operator() {
    let registry = OperatorRegistry::with_defaults();
    let err = registry.create(&OperatorDef::new("Unsqueeze"), DType::Float32).unwrap_err();

    assert!(matches!(err, Error::UnknownOperator { ref op_type, dtype: DType::Float32 } if op_type == "Unsqueeze"));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_unregistered_dtype() {
    let registry = OperatorRegistry::with_defaults();
    let err = registry.create(&squeeze_def(&[0]), DType::UInt8).unwrap_err();
    assert!(matches!(err, Error::UnknownOperator { dtype: DType::UInt8, .. }));
}

#[test]
fn test_create_propagates_config_error() {
    let registry = OperatorRegistry::with_defaults();
    let err = registry.create(&squeeze_def(&[]), DType::Float32).unwrap_err();
    assert!(matches!(err, Error::EmptyDimensions));
}

#[test]
fn test_slot_arity() {
    let registry = OperatorRegistry::with_defaults();
    let mut op = registry.create(&squeeze_def(&[0]), DType::Float32).unwrap();
    let input = iota(&[1, 2]);

    let err = op.run(&[&input, &input], &mut [output()]).unwrap_err();
    assert!(matches!(err, Error::SlotCount { slot: "input", expected: 1, actual: 2, .. }));
    assert_eq!(err.kind(), ErrorKind::Binding);

    let err = op.run(&[&input], &mut []).unwrap_err();
    assert!(matches!(err, Error::SlotCount { slot: "output", expected: 1, actual: 0, .. }));
    assert_eq!(err.to_string(), "Squeeze expects 1 output(s), got 0");
}

#[test]
fn test_custom_registration() {
    let mut registry = OperatorRegistry::new();
    registry.register_squeeze::<u16>();
    assert!(registry.contains("Squeeze", DType::UInt16));
    assert!(!registry.contains("Squeeze", DType::Float32));
}
