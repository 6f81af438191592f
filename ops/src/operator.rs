use std::collections::HashMap;
use std::fmt;

use snafu::OptionExt;
use tessera_device::DeviceTensor;
use tessera_dtype::{DType, Element};

use crate::args::OperatorDef;
use crate::error::{Result, SlotCountSnafu, UnknownOperatorSnafu};
use crate::squeeze::SqueezeOp;

/// An operator instance driven by an execution engine.
///
/// The engine binds tensors to positional slots and calls `run` repeatedly;
/// an instance is never invoked concurrently with itself.
pub trait Operator: fmt::Debug {
    fn op_type(&self) -> &'static str;

    fn run(&mut self, inputs: &[&DeviceTensor], outputs: &mut [DeviceTensor]) -> Result<()>;
}

impl<T: Element> Operator for SqueezeOp<T> {
    fn op_type(&self) -> &'static str {
        Self::OP_TYPE
    }

    fn run(&mut self, inputs: &[&DeviceTensor], outputs: &mut [DeviceTensor]) -> Result<()> {
        let [input] = inputs else {
            return SlotCountSnafu { op_type: Self::OP_TYPE, slot: "input", expected: 1usize, actual: inputs.len() }
                .fail();
        };
        let actual = outputs.len();
        let [output] = outputs else {
            return SlotCountSnafu { op_type: Self::OP_TYPE, slot: "output", expected: 1usize, actual }.fail();
        };
        self.invoke(input, output)
    }
}

pub type Constructor = fn(&OperatorDef) -> Result<Box<dyn Operator>>;

fn construct_squeeze<T: Element>(def: &OperatorDef) -> Result<Box<dyn Operator>> {
    Ok(Box::new(SqueezeOp::<T>::new(def)?))
}

/// Maps operator type names and element types to constructors.
#[derive(Default)]
pub struct OperatorRegistry {
    constructors: HashMap<(String, DType), Constructor>,
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in operator.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_squeeze::<f32>();
        registry.register_squeeze::<f64>();
        registry.register_squeeze::<i32>();
        registry.register_squeeze::<i64>();
        registry
    }

    pub fn register(&mut self, op_type: impl Into<String>, dtype: DType, constructor: Constructor) {
        let op_type = op_type.into();
        tracing::debug!(op_type = %op_type, %dtype, "registering operator");
        self.constructors.insert((op_type, dtype), constructor);
    }

    pub fn register_squeeze<T: Element>(&mut self) {
        self.register(SqueezeOp::<T>::OP_TYPE, T::DTYPE, construct_squeeze::<T>);
    }

    pub fn contains(&self, op_type: &str, dtype: DType) -> bool {
        self.constructors.contains_key(&(op_type.to_string(), dtype))
    }

    /// Instantiate the operator described by `def` for elements of `dtype`.
    pub fn create(&self, def: &OperatorDef, dtype: DType) -> Result<Box<dyn Operator>> {
        let constructor = self
            .constructors
            .get(&(def.op_type.clone(), dtype))
            .context(UnknownOperatorSnafu { op_type: def.op_type.as_str(), dtype })?;
        constructor(def)
    }
}
