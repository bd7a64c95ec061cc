//! Wire record types
//!
//! These mirror the remote protocol's record shapes. Oneof-style records are
//! structs of optional fields so that an unset record is representable; the
//! decode side owns precedence and validation. The exact framing (here
//! exercised as JSON via serde) belongs to the external protocol layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar payload of a full argument record: float, boolean list, or string
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireArgValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_values: Option<Vec<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

/// A function node on the wire: operator tag plus ordered operands
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireFunction {
    #[serde(rename = "type")]
    pub func_type: String,
    #[serde(default)]
    pub args: Vec<WireArg>,
}

/// Full argument record: scalar value, symbol, or function
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireArg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_value: Option<WireArgValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<WireFunction>,
}

impl WireArg {
    /// A numeric argument record
    pub fn float(value: f64) -> Self {
        Self {
            arg_value: Some(WireArgValue {
                float_value: Some(value),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// A boolean-list argument record
    pub fn bools(values: Vec<bool>) -> Self {
        Self {
            arg_value: Some(WireArgValue {
                bool_values: Some(values),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// A string argument record
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            arg_value: Some(WireArgValue {
                string_value: Some(value.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// A symbol argument record
    pub fn symbol(name: impl Into<String>) -> Self {
        Self {
            symbol: Some(name.into()),
            ..Default::default()
        }
    }

    /// A function argument record
    pub fn function(func_type: impl Into<String>, args: Vec<WireArg>) -> Self {
        Self {
            func: Some(WireFunction {
                func_type: func_type.into(),
                args,
            }),
            ..Default::default()
        }
    }

    /// Whether no field of the record is set
    pub fn is_unset(&self) -> bool {
        self.arg_value.is_none() && self.symbol.is_none() && self.func.is_none()
    }
}

/// Float-only argument record: number, symbol, or function
///
/// A slimmed-down form of [`WireArg`] used where the protocol expects a
/// float or a float-valued expression. Strings and boolean lists have no
/// representation here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireFloatArg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<WireFunction>,
}

impl WireFloatArg {
    /// Whether no field of the record is set
    pub fn is_unset(&self) -> bool {
        self.float_value.is_none() && self.symbol.is_none() && self.func.is_none()
    }
}

/// Calibration token attached to an operation: direct value or constant index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireToken {
    Value(String),
    ConstantIndex(usize),
}

/// One gate operation on the wire
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireOperation {
    /// Format tag routing this record to a deserializer
    pub gate_id: String,
    /// Target qubits, order-preserving
    pub qubits: Vec<usize>,
    /// Named argument records
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, WireArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<WireToken>,
}

/// Repetition specification for a circuit operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireRepetition {
    RepetitionCount(u64),
    RepetitionIds(Vec<String>),
}

/// Qubit-to-qubit remap entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireQubitMapEntry {
    pub key: usize,
    pub value: usize,
}

/// Measurement-key remap entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireKeyMapEntry {
    pub key: String,
    pub value: String,
}

/// Parameter-argument remap entry; both sides are full argument records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireArgMapEntry {
    pub key: WireArg,
    pub value: WireArg,
}

/// A repeated/parameterized reference to a shared sub-circuit
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireCircuitOperation {
    /// Index of the referenced circuit in the program's constant table
    pub circuit_constant_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_specification: Option<WireRepetition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qubit_map: Vec<WireQubitMapEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measurement_key_map: Vec<WireKeyMapEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arg_map: Vec<WireArgMapEntry>,
}

/// One sequential step of a circuit
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMoment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<WireOperation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub circuit_operations: Vec<WireCircuitOperation>,
}

/// A circuit on the wire: ordered moments
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireCircuit {
    #[serde(default)]
    pub moments: Vec<WireMoment>,
}

/// One entry of the program's constant table
///
/// Later entries may reference earlier ones by index, so the table forms a
/// DAG of shared values rather than a tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireConstant {
    StringValue(String),
    Circuit(WireCircuit),
}

impl WireConstant {
    /// Short kind name used in error reporting
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::StringValue(_) => "string",
            Self::Circuit(_) => "circuit",
        }
    }
}

/// Program-level language declaration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireLanguage {
    #[serde(default)]
    pub arg_function_language: String,
}

/// A complete serialized program
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireProgram {
    /// Format version for compatibility checking
    pub version: u32,
    pub language: WireLanguage,
    pub circuit: WireCircuit,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<WireConstant>,
}
