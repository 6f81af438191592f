//! Tensor operators over layout-tagged storage.
//!
//! # Example
//!
//! ```
//! use tessera_device::{DeviceTensor, MemoryFormat};
//! use tessera_ops::{Argument, OperatorDef, SqueezeOp};
//!
//! let def = OperatorDef::new("Squeeze").arg("dims", Argument::Ints(vec![1]));
//! let mut op = SqueezeOp::<f32>::new(&def)?;
//!
//! let input = DeviceTensor::from_slice(&[2, 1, 3], &[0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0])?
//!     .reorder(MemoryFormat::Blocked { block: 8 })?;
//! let mut output = DeviceTensor::empty(tessera_dtype::DType::Float32);
//! op.invoke(&input, &mut output)?;
//!
//! assert_eq!(output.dims(), &[2, 3]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod args;
pub mod dims;
pub mod error;
pub mod operator;
pub mod shape;
pub mod squeeze;

pub use adapter::{ExecutorState, LayoutAdapter};
pub use args::{Argument, OperatorDef, RepeatedArgument};
pub use dims::DimensionSpec;
pub use error::{Error, ErrorKind, Result};
pub use operator::{Operator, OperatorRegistry};
pub use shape::compute_squeezed_dims;
pub use squeeze::SqueezeOp;
