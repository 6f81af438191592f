use crate::error::Error;
use crate::{DimensionSpec, ErrorKind, compute_squeezed_dims};
use test_case::test_case;

fn squeeze(dims: &[usize], axes: &[i64]) -> crate::Result<Vec<usize>> {
    let spec = DimensionSpec::new(axes)?;
    compute_squeezed_dims(dims, &spec).map(|dims| dims.to_vec())
}

#[test_case(&[2, 1, 3], &[1], &[2, 3]; "middle_axis")]
#[test_case(&[1, 3, 1, 5], &[0, 2], &[3, 5]; "two_axes")]
#[test_case(&[1, 4], &[0], &[4]; "leading_axis")]
#[test_case(&[4, 1], &[1], &[4]; "trailing_axis")]
#[test_case(&[1], &[0], &[]; "to_scalar")]
#[test_case(&[1, 1, 1], &[0, 1, 2], &[]; "all_axes")]
#[test_case(&[3, 1, 1, 2], &[2], &[3, 1, 2]; "keeps_other_singletons")]
fn test_squeezed_dims(dims: &[usize], axes: &[i64], expected: &[usize]) {
    assert_eq!(squeeze(dims, axes).unwrap(), expected);
}

#[test_case(&[2, 3], &[0], 0, 2; "leading_non_singleton")]
#[test_case(&[1, 4, 1], &[0, 1], 1, 4; "second_target")]
#[test_case(&[1, 1, 0], &[2], 2, 0; "empty_axis")]
fn test_non_singleton_rejected(dims: &[usize], axes: &[i64], dim: usize, size: usize) {
    let err = squeeze(dims, axes).unwrap_err();
    assert!(matches!(err, Error::SqueezeDimensionNotOne { dim: d, size: s } if d == dim && s == size));
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_error_message() {
    let err = squeeze(&[2, 3], &[0]).unwrap_err();
    assert_eq!(err.to_string(), "cannot squeeze dimension 0: size is 2, not 1");
}
