//! Circuit containers and circuit operations

use crate::gate::GateOp;
use crate::qubit::QubitId;
use crate::value::ArgValue;
use std::fmt;
use std::sync::Arc;

/// A quantum circuit: an ordered sequence of operations
///
/// Each operation occupies one sequential step. Operations are either plain
/// gate applications or references to shared sub-circuits.
///
/// # Example
/// ```
/// use qwire::Circuit;
///
/// let circuit = Circuit::new();
/// assert!(circuit.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create a new, empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a circuit from a sequence of operations
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Append an operation
    pub fn push(&mut self, operation: impl Into<Operation>) {
        self.operations.push(operation.into());
    }

    /// The operations, in sequential order
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations in the circuit
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit has no operations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Freeze this circuit for sharing as a constant-table value
    pub fn freeze(self) -> Arc<FrozenCircuit> {
        Arc::new(FrozenCircuit { circuit: self })
    }
}

/// An immutable circuit shared between circuit operations
///
/// Frozen circuits are what constant-table entries resolve to; circuit
/// operations hold them by `Arc` and never mutate them. Remappings are
/// carried on the operation and applied at use time.
#[derive(Clone, Debug)]
pub struct FrozenCircuit {
    circuit: Circuit,
}

impl FrozenCircuit {
    /// The underlying circuit
    #[inline]
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The operations of the underlying circuit
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        self.circuit.operations()
    }
}

/// How many times a referenced sub-circuit is applied
///
/// Exactly one of a repetition count or an explicit per-iteration identifier
/// list; a wire record carrying neither defaults to `Count(1)`.
///
/// # Example
/// ```
/// use qwire::Repetition;
///
/// assert_eq!(Repetition::default().repetitions(), 1);
/// let ids = Repetition::Ids(vec!["a".into(), "b".into(), "c".into()]);
/// assert_eq!(ids.repetitions(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Repetition {
    /// Apply the sub-circuit a fixed number of times
    Count(u64),
    /// Apply once per identifier, in order
    Ids(Vec<String>),
}

impl Repetition {
    /// The derived number of repetitions
    pub fn repetitions(&self) -> usize {
        match self {
            Self::Count(n) => *n as usize,
            Self::Ids(ids) => ids.len(),
        }
    }
}

impl Default for Repetition {
    fn default() -> Self {
        Self::Count(1)
    }
}

/// A repeated, remapped application of a shared sub-circuit
///
/// The three maps are substitutions applied at use time; the shared circuit
/// itself is never modified.
#[derive(Clone, Debug)]
pub struct CircuitOp {
    /// The shared sub-circuit being applied
    pub circuit: Arc<FrozenCircuit>,
    /// Repetition count or explicit repetition ids
    pub repetition: Repetition,
    /// Qubit-to-qubit remapping
    pub qubit_map: Vec<(QubitId, QubitId)>,
    /// Measurement-key remapping
    pub measurement_key_map: Vec<(String, String)>,
    /// Parameter-argument substitution (keys: strings/symbols; values:
    /// strings, symbols, or numbers)
    pub arg_map: Vec<(ArgValue, ArgValue)>,
}

impl CircuitOp {
    /// Apply a frozen circuit once, with no remappings
    pub fn new(circuit: Arc<FrozenCircuit>) -> Self {
        Self {
            circuit,
            repetition: Repetition::default(),
            qubit_map: Vec::new(),
            measurement_key_map: Vec::new(),
            arg_map: Vec::new(),
        }
    }

    /// Builder pattern: set the repetition specification
    pub fn with_repetition(mut self, repetition: Repetition) -> Self {
        self.repetition = repetition;
        self
    }

    /// Builder pattern: set the qubit remapping
    pub fn with_qubit_map(mut self, map: Vec<(QubitId, QubitId)>) -> Self {
        self.qubit_map = map;
        self
    }

    /// Builder pattern: set the measurement-key remapping
    pub fn with_measurement_key_map(mut self, map: Vec<(String, String)>) -> Self {
        self.measurement_key_map = map;
        self
    }

    /// Builder pattern: set the parameter-argument substitution
    pub fn with_arg_map(mut self, map: Vec<(ArgValue, ArgValue)>) -> Self {
        self.arg_map = map;
        self
    }
}

/// An operation within a circuit
///
/// A closed set: plain gate applications and sub-circuit applications are
/// the only two kinds the wire format carries.
#[derive(Clone, Debug)]
pub enum Operation {
    /// A gate applied to qubits
    Gate(GateOp),
    /// A shared sub-circuit applied with repetition and remappings
    Circuit(CircuitOp),
}

impl From<GateOp> for Operation {
    fn from(op: GateOp) -> Self {
        Self::Gate(op)
    }
}

impl From<CircuitOp> for Operation {
    fn from(op: CircuitOp) -> Self {
        Self::Circuit(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gate(op) => write!(f, "{}", op),
            Self::Circuit(op) => write!(
                f,
                "circuit[{} ops] x{}",
                op.circuit.operations().len(),
                op.repetition.repetitions()
            ),
        }
    }
}
