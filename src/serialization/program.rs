//! Whole-program codec
//!
//! [`ProgramSerializer`] owns a registry of gate deserializers keyed by
//! format tag plus the circuit-operation deserializer, and drives the
//! two-phase decode: constants first, in order, then the operations that
//! reference them.

use crate::circuit::{Circuit, CircuitOp, FrozenCircuit, Operation, Repetition};
use crate::error::WireError;
use crate::gate::GateOp;
use crate::lang::{infer_function_language, FunctionLanguage};
use crate::serialization::args::arg_to_wire;
use crate::serialization::op::{CircuitOpDeserializer, GateOpDeserializer, ResolvedConstant};
use crate::serialization::WIRE_FORMAT_VERSION;
use crate::wire::{
    WireArgMapEntry, WireCircuit, WireCircuitOperation, WireConstant, WireKeyMapEntry,
    WireLanguage, WireMoment, WireOperation, WireProgram, WireQubitMapEntry, WireRepetition,
    WireToken,
};
use crate::Result;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Encodes circuits to wire programs and decodes them back
///
/// Deserializers are registered at construction time; decoding routes each
/// operation record to the deserializer matching its format tag.
///
/// # Example
/// ```no_run
/// use qwire::serialization::{GateOpDeserializer, ProgramSerializer};
/// # fn deserializer() -> GateOpDeserializer { unimplemented!() }
///
/// let serializer = ProgramSerializer::new().with_deserializer(deserializer());
/// ```
#[derive(Default)]
pub struct ProgramSerializer {
    deserializers: BTreeMap<String, GateOpDeserializer>,
    circuit_deserializer: CircuitOpDeserializer,
}

impl ProgramSerializer {
    /// Create a serializer with no gate deserializers registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: register a gate deserializer under its format tag
    pub fn with_deserializer(mut self, deserializer: GateOpDeserializer) -> Self {
        self.deserializers
            .insert(deserializer.gate_id().to_string(), deserializer);
        self
    }

    /// Format tags with a registered deserializer
    pub fn gate_ids(&self) -> impl Iterator<Item = &str> {
        self.deserializers.keys().map(String::as_str)
    }

    /// Encode a circuit into a wire program
    ///
    /// With `language` of `None`, arguments are encoded unrestricted and the
    /// minimal language the content actually needs is inferred and stamped
    /// into the program (least-flexible-language policy). With an explicit
    /// language, encoding fails if any expression uses an operator outside
    /// it, and the program declares that language.
    pub fn serialize(
        &self,
        circuit: &Circuit,
        language: Option<FunctionLanguage>,
    ) -> Result<WireProgram> {
        let mut constants = Vec::new();
        let mut interned = Vec::new();
        let wire_circuit =
            self.serialize_operations(circuit.operations(), language, &mut constants, &mut interned)?;

        let language = match language {
            Some(language) => language,
            None => infer_function_language(&wire_circuit, &constants),
        };
        debug!(
            "serialized program: {} moments, {} constants, language '{}'",
            wire_circuit.moments.len(),
            constants.len(),
            language
        );

        Ok(WireProgram {
            version: WIRE_FORMAT_VERSION,
            language: WireLanguage {
                arg_function_language: language.wire_name().to_string(),
            },
            circuit: wire_circuit,
            constants,
        })
    }

    /// Decode a wire program into a circuit
    ///
    /// Resolves the constant table in a single forward pass (entries only
    /// reference earlier entries), then decodes the top-level circuit,
    /// flattening moments into sequential operations.
    pub fn deserialize(&self, program: &WireProgram) -> Result<Circuit> {
        if program.version > WIRE_FORMAT_VERSION {
            return Err(WireError::VersionMismatch {
                expected: WIRE_FORMAT_VERSION,
                actual: program.version,
            });
        }
        let language = FunctionLanguage::from_wire_name(&program.language.arg_function_language)?;

        let mut resolved: Vec<ResolvedConstant> = Vec::with_capacity(program.constants.len());
        for constant in &program.constants {
            let value = match constant {
                WireConstant::StringValue(token) => ResolvedConstant::Token(token.clone()),
                WireConstant::Circuit(wire_circuit) => {
                    let sub = self.deserialize_circuit(
                        wire_circuit,
                        language,
                        &program.constants,
                        &resolved,
                    )?;
                    ResolvedConstant::Circuit(sub.freeze())
                }
            };
            resolved.push(value);
        }
        trace!(
            "resolved {} constants, language '{}'",
            resolved.len(),
            language
        );

        self.deserialize_circuit(&program.circuit, language, &program.constants, &resolved)
    }

    fn serialize_operations(
        &self,
        operations: &[Operation],
        language: Option<FunctionLanguage>,
        constants: &mut Vec<WireConstant>,
        interned: &mut Vec<(usize, Arc<FrozenCircuit>)>,
    ) -> Result<WireCircuit> {
        let mut moments = Vec::with_capacity(operations.len());
        for operation in operations {
            let mut moment = WireMoment::default();
            match operation {
                Operation::Gate(op) => {
                    moment.operations.push(self.serialize_gate_op(op, language)?);
                }
                Operation::Circuit(op) => {
                    moment.circuit_operations.push(self.serialize_circuit_op(
                        op, language, constants, interned,
                    )?);
                }
            }
            moments.push(moment);
        }
        Ok(WireCircuit { moments })
    }

    fn serialize_gate_op(
        &self,
        op: &GateOp,
        language: Option<FunctionLanguage>,
    ) -> Result<WireOperation> {
        let mut args = BTreeMap::new();
        for (name, value) in op.gate().wire_args() {
            args.insert(name, arg_to_wire(&value, language)?);
        }
        Ok(WireOperation {
            gate_id: op.gate().wire_id().to_string(),
            qubits: op.qubits().iter().map(|q| q.index()).collect(),
            args,
            token: op.token().map(|t| WireToken::Value(t.to_string())),
        })
    }

    fn serialize_circuit_op(
        &self,
        op: &CircuitOp,
        language: Option<FunctionLanguage>,
        constants: &mut Vec<WireConstant>,
        interned: &mut Vec<(usize, Arc<FrozenCircuit>)>,
    ) -> Result<WireCircuitOperation> {
        // Shared sub-circuits are interned by identity so repeated uses
        // reference one constant-table entry. Nested sub-circuits serialize
        // first, keeping every reference strictly backward.
        let index = match interned
            .iter()
            .find(|(_, circuit)| Arc::ptr_eq(circuit, &op.circuit))
        {
            Some((index, _)) => *index,
            None => {
                let sub = self.serialize_operations(
                    op.circuit.operations(),
                    language,
                    constants,
                    interned,
                )?;
                constants.push(WireConstant::Circuit(sub));
                let index = constants.len() - 1;
                interned.push((index, Arc::clone(&op.circuit)));
                index
            }
        };

        let repetition_specification = Some(match &op.repetition {
            Repetition::Count(n) => WireRepetition::RepetitionCount(*n),
            Repetition::Ids(ids) => WireRepetition::RepetitionIds(ids.clone()),
        });

        let mut arg_map = Vec::with_capacity(op.arg_map.len());
        for (key, value) in &op.arg_map {
            arg_map.push(WireArgMapEntry {
                key: arg_to_wire(key, language)?,
                value: arg_to_wire(value, language)?,
            });
        }

        Ok(WireCircuitOperation {
            circuit_constant_index: index,
            repetition_specification,
            qubit_map: op
                .qubit_map
                .iter()
                .map(|(key, value)| WireQubitMapEntry {
                    key: key.index(),
                    value: value.index(),
                })
                .collect(),
            measurement_key_map: op
                .measurement_key_map
                .iter()
                .map(|(key, value)| WireKeyMapEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            arg_map,
        })
    }

    fn deserialize_circuit(
        &self,
        wire_circuit: &WireCircuit,
        language: FunctionLanguage,
        constants: &[WireConstant],
        resolved: &[ResolvedConstant],
    ) -> Result<Circuit> {
        let mut circuit = Circuit::new();
        for moment in &wire_circuit.moments {
            for op in &moment.operations {
                let deserializer = self
                    .deserializers
                    .get(&op.gate_id)
                    .ok_or_else(|| WireError::UnknownGateId(op.gate_id.clone()))?;
                circuit.push(deserializer.from_wire(op, language, Some(constants))?);
            }
            for op in &moment.circuit_operations {
                circuit.push(self.circuit_deserializer.from_wire(
                    op,
                    language,
                    Some(constants),
                    Some(resolved),
                )?);
            }
        }
        Ok(circuit)
    }
}
