//! Operation deserializers
//!
//! Each gate deserializer describes, declaratively, how operation records
//! with one format tag become a strongly-typed gate operation: which named
//! wire arguments to read, how to default or transform them, and how to call
//! the gate constructor. Circuit-operation records are handled by a second,
//! structurally different variant that resolves shared sub-circuits out of
//! the program's constant table.

use crate::circuit::{CircuitOp, FrozenCircuit, Repetition};
use crate::error::WireError;
use crate::gate::{Gate, GateOp};
use crate::lang::FunctionLanguage;
use crate::qubit::QubitId;
use crate::serialization::args::arg_from_wire;
use crate::value::ArgValue;
use crate::wire::{WireCircuitOperation, WireConstant, WireOperation, WireRepetition, WireToken};
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Decoded constructor arguments, keyed by constructor parameter name
pub type ArgMap = BTreeMap<String, ArgValue>;

/// Builds a gate from its decoded constructor arguments
pub type GateConstructor = Box<dyn Fn(&ArgMap) -> Result<Arc<dyn Gate>> + Send + Sync>;

/// Transforms one decoded value before it reaches the constructor
pub type ValueFunc = Box<dyn Fn(ArgValue) -> ArgValue + Send + Sync>;

/// Post-construction hook over the assembled operation and its wire record
pub type OpWrapper = Box<dyn Fn(GateOp, &WireOperation) -> GateOp + Send + Sync>;

/// Specification of one deserialized gate argument
///
/// Maps a named wire field to a constructor parameter. Defaulting rules:
/// - `default` present: absence on the wire silently yields the default
///   (`required` is ignored);
/// - no default, `required`: absence is an error;
/// - no default, not required: absence omits the parameter.
pub struct DeserializingArg {
    serialized_name: String,
    constructor_arg_name: String,
    value_func: Option<ValueFunc>,
    required: bool,
    default: Option<ArgValue>,
}

impl DeserializingArg {
    /// A required argument
    pub fn required(
        serialized_name: impl Into<String>,
        constructor_arg_name: impl Into<String>,
    ) -> Self {
        Self {
            serialized_name: serialized_name.into(),
            constructor_arg_name: constructor_arg_name.into(),
            value_func: None,
            required: true,
            default: None,
        }
    }

    /// An optional argument; absence omits the constructor parameter
    pub fn optional(
        serialized_name: impl Into<String>,
        constructor_arg_name: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(serialized_name, constructor_arg_name)
        }
    }

    /// Builder pattern: set a default used when the wire field is absent
    pub fn with_default(mut self, default: ArgValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Builder pattern: transform the decoded value before construction
    pub fn with_value_func(
        mut self,
        value_func: impl Fn(ArgValue) -> ArgValue + Send + Sync + 'static,
    ) -> Self {
        self.value_func = Some(Box::new(value_func));
        self
    }
}

/// Deserializes operation records with one format tag into gate operations
///
/// # Example
/// ```
/// use qwire::serialization::{DeserializingArg, GateOpDeserializer};
/// use qwire::{ArgValue, Gate, WireError};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct XPow { exponent: ArgValue }
/// impl Gate for XPow {
///     fn name(&self) -> &str { "XPow" }
///     fn num_qubits(&self) -> usize { 1 }
///     fn wire_id(&self) -> &str { "x_pow" }
///     fn wire_args(&self) -> Vec<(String, ArgValue)> {
///         vec![("exponent".into(), self.exponent.clone())]
///     }
/// }
///
/// let deserializer = GateOpDeserializer::new("x_pow", |args| {
///     let exponent = args
///         .get("exponent")
///         .cloned()
///         .ok_or_else(|| WireError::MissingRequiredArgument("exponent".into()))?;
///     Ok(Arc::new(XPow { exponent }) as Arc<dyn Gate>)
/// })
/// .with_arg(DeserializingArg::required("exponent", "exponent").with_default(ArgValue::Int(1)));
/// assert_eq!(deserializer.gate_id(), "x_pow");
/// ```
pub struct GateOpDeserializer {
    gate_id: String,
    args: Vec<DeserializingArg>,
    num_qubits_param: Option<String>,
    constructor: GateConstructor,
    op_wrapper: Option<OpWrapper>,
    deserialize_tokens: bool,
}

impl GateOpDeserializer {
    /// Create a deserializer for the given format tag and gate constructor
    pub fn new(
        gate_id: impl Into<String>,
        constructor: impl Fn(&ArgMap) -> Result<Arc<dyn Gate>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            gate_id: gate_id.into(),
            args: Vec::new(),
            num_qubits_param: None,
            constructor: Box::new(constructor),
            op_wrapper: None,
            deserialize_tokens: true,
        }
    }

    /// Builder pattern: add one argument specification
    pub fn with_arg(mut self, arg: DeserializingArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Builder pattern: set all argument specifications
    pub fn with_args(mut self, args: Vec<DeserializingArg>) -> Self {
        self.args = args;
        self
    }

    /// Builder pattern: inject the resolved qubit count as an extra
    /// constructor argument under the given parameter name
    pub fn with_num_qubits_param(mut self, param: impl Into<String>) -> Self {
        self.num_qubits_param = Some(param.into());
        self
    }

    /// Builder pattern: wrap the assembled operation, e.g. to attach tags
    pub fn with_op_wrapper(
        mut self,
        wrapper: impl Fn(GateOp, &WireOperation) -> GateOp + Send + Sync + 'static,
    ) -> Self {
        self.op_wrapper = Some(Box::new(wrapper));
        self
    }

    /// Builder pattern: skip calibration-token handling
    pub fn without_tokens(mut self) -> Self {
        self.deserialize_tokens = false;
        self
    }

    /// The format tag this deserializer consumes
    #[inline]
    pub fn gate_id(&self) -> &str {
        &self.gate_id
    }

    /// Deserialize one operation record
    ///
    /// `constants` is the program's raw constant table, consulted only for
    /// token constant references.
    pub fn from_wire(
        &self,
        op: &WireOperation,
        language: FunctionLanguage,
        constants: Option<&[WireConstant]>,
    ) -> Result<GateOp> {
        let qubits: Vec<QubitId> = op.qubits.iter().copied().map(QubitId::new).collect();

        let mut args = self.args_from_wire(op, language)?;
        if let Some(param) = &self.num_qubits_param {
            args.insert(param.clone(), ArgValue::Int(qubits.len() as i64));
        }

        let gate = (self.constructor)(&args)?;
        let mut gate_op = GateOp::new(gate, &qubits)?;
        if let Some(wrapper) = &self.op_wrapper {
            gate_op = wrapper(gate_op, op);
        }
        if self.deserialize_tokens {
            if let Some(token) = &op.token {
                gate_op = gate_op.with_token(self.token_value(token, constants)?);
            }
        }
        Ok(gate_op)
    }

    fn args_from_wire(&self, op: &WireOperation, language: FunctionLanguage) -> Result<ArgMap> {
        let mut out = ArgMap::new();
        for spec in &self.args {
            let wire_arg = op.args.get(&spec.serialized_name);
            if wire_arg.is_none() {
                if let Some(default) = &spec.default {
                    out.insert(spec.constructor_arg_name.clone(), default.clone());
                    continue;
                }
            }

            let required_name = spec.required.then_some(spec.serialized_name.as_str());
            let mut value = match arg_from_wire(wire_arg, language, required_name)? {
                Some(value) => value,
                None => continue,
            };
            if let Some(value_func) = &spec.value_func {
                value = value_func(value);
            }
            out.insert(spec.constructor_arg_name.clone(), value);
        }
        Ok(out)
    }

    fn token_value(&self, token: &WireToken, constants: Option<&[WireConstant]>) -> Result<String> {
        match token {
            WireToken::Value(value) => Ok(value.clone()),
            WireToken::ConstantIndex(index) => {
                let constants = constants
                    .filter(|c| !c.is_empty())
                    .ok_or(WireError::MissingConstantTable)?;
                let constant = constants
                    .get(*index)
                    .ok_or_else(|| WireError::index_out_of_range(*index, constants.len()))?;
                match constant {
                    WireConstant::StringValue(value) => Ok(value.clone()),
                    other => Err(WireError::WrongConstantKind {
                        index: *index,
                        expected: "string",
                        actual: other.kind(),
                    }),
                }
            }
        }
    }
}

/// A resolved value from the program's constant table
///
/// The table is an arena indexed by position; operation records reference
/// entries by index, never by pointer, so bounds and kind checks stay
/// explicit.
#[derive(Clone, Debug)]
pub enum ResolvedConstant {
    /// A calibration-token string
    Token(String),
    /// A fully-deserialized shared sub-circuit
    Circuit(Arc<FrozenCircuit>),
}

impl ResolvedConstant {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Token(_) => "string",
            Self::Circuit(_) => "circuit",
        }
    }
}

/// Deserializes circuit-operation records into sub-circuit applications
///
/// Requires both the raw constant records and their already-resolved values;
/// the caller resolves entries in order so that every reference points at an
/// already-complete value.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircuitOpDeserializer;

impl CircuitOpDeserializer {
    /// The format tag this deserializer consumes
    pub const SERIALIZED_ID: &'static str = "circuit";

    /// Deserialize one circuit-operation record
    pub fn from_wire(
        &self,
        op: &WireCircuitOperation,
        language: FunctionLanguage,
        constants: Option<&[WireConstant]>,
        resolved_constants: Option<&[ResolvedConstant]>,
    ) -> Result<CircuitOp> {
        let resolved = match (constants, resolved_constants) {
            (Some(_), Some(resolved)) => resolved,
            _ => return Err(WireError::MissingConstantContext),
        };

        let index = op.circuit_constant_index;
        let constant = resolved
            .get(index)
            .ok_or_else(|| WireError::index_out_of_range(index, resolved.len()))?;
        let circuit = match constant {
            ResolvedConstant::Circuit(circuit) => Arc::clone(circuit),
            other => {
                return Err(WireError::WrongConstantKind {
                    index,
                    expected: "circuit",
                    actual: other.kind(),
                })
            }
        };

        let repetition = match &op.repetition_specification {
            Some(WireRepetition::RepetitionCount(n)) => Repetition::Count(*n),
            Some(WireRepetition::RepetitionIds(ids)) => Repetition::Ids(ids.clone()),
            None => Repetition::default(),
        };

        let qubit_map = op
            .qubit_map
            .iter()
            .map(|entry| (QubitId::new(entry.key), QubitId::new(entry.value)))
            .collect();
        let measurement_key_map = op
            .measurement_key_map
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect();

        let mut arg_map = Vec::with_capacity(op.arg_map.len());
        for entry in &op.arg_map {
            let key = arg_from_wire(Some(&entry.key), language, Some("a parameter map key"))?
                .ok_or_else(|| {
                    WireError::MissingRequiredArgument("a parameter map key".to_string())
                })?;
            let value = arg_from_wire(Some(&entry.value), language, Some("a parameter map value"))?
                .ok_or_else(|| {
                    WireError::MissingRequiredArgument("a parameter map value".to_string())
                })?;

            if !matches!(key, ArgValue::Str(_) | ArgValue::Symbol(_)) {
                return Err(WireError::InvalidMapEntry {
                    map: "arg_map",
                    side: "key",
                    kind: key.kind(),
                });
            }
            if !matches!(
                value,
                ArgValue::Str(_) | ArgValue::Symbol(_) | ArgValue::Int(_) | ArgValue::Float(_)
            ) {
                return Err(WireError::InvalidMapEntry {
                    map: "arg_map",
                    side: "value",
                    kind: value.kind(),
                });
            }
            arg_map.push((key, value));
        }

        Ok(CircuitOp {
            circuit,
            repetition,
            qubit_map,
            measurement_key_map,
            arg_map,
        })
    }
}
