//! Operator definitions and their named arguments.

use std::collections::BTreeMap;

use snafu::OptionExt;

use crate::error::{ArgumentTypeSnafu, Result};

/// A typed operator argument value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Argument {
    Int(i64),
    Float(f64),
    String(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strings(Vec<String>),
}

impl Argument {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Ints(_) => "ints",
            Self::Floats(_) => "floats",
            Self::Strings(_) => "strings",
        }
    }
}

/// Element types readable from a repeated argument.
pub trait RepeatedArgument: Sized {
    const TYPE_NAME: &'static str;

    fn from_argument(arg: &Argument) -> Option<Vec<Self>>;
}

macro_rules! impl_repeated_argument {
    ($($ty:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(impl RepeatedArgument for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_argument(arg: &Argument) -> Option<Vec<Self>> {
                match arg {
                    Argument::$variant(values) => Some(values.clone()),
                    _ => None,
                }
            }
        })*
    };
}

impl_repeated_argument! {
    i64 => Ints, "ints";
    f64 => Floats, "floats";
    String => Strings, "strings";
}

/// Declarative description of one operator instance.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorDef {
    pub op_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inputs: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outputs: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub args: BTreeMap<String, Argument>,
}

impl OperatorDef {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self { op_type: op_type.into(), ..Default::default() }
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: Argument) -> Self {
        self.args.insert(name.into(), value);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.args.get(name)
    }

    /// Read a repeated argument. A missing argument reads as an empty list.
    pub fn repeated_arg<T: RepeatedArgument>(&self, name: &str) -> Result<Vec<T>> {
        match self.args.get(name) {
            None => Ok(Vec::new()),
            Some(arg) => T::from_argument(arg).context(ArgumentTypeSnafu {
                name,
                expected: T::TYPE_NAME,
                actual: arg.type_name(),
            }),
        }
    }
}
