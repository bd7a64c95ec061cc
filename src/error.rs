//! Error types for qwire

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while encoding or decoding circuit programs
///
/// Every variant is a local, non-retryable validation failure: the input was
/// malformed or incompatible with the declared function language. Errors
/// propagate to the caller unmodified; the codec never coerces or drops data.
#[derive(Debug, Error)]
pub enum WireError {
    /// Encoding used a function operator outside the active language tier
    #[error("function type '{func_type}' not supported by language '{language}'")]
    UnsupportedFunction { func_type: String, language: String },

    /// A wire function record carries an operator the declared tier rejects
    #[error("unrecognized function type '{func_type}' for language '{language}'")]
    UnrecognizedFunction { func_type: String, language: String },

    /// Value kind not representable in the requested wire shape
    #[error("argument of kind '{kind}' cannot be encoded in the {shape} shape")]
    UnsupportedArgValue { kind: &'static str, shape: &'static str },

    /// A required argument was absent from the wire record
    #[error("argument '{0}' is missing but is required")]
    MissingRequiredArgument(String),

    /// The program declared an unknown function language
    #[error("unrecognized function language '{0}'")]
    UnrecognizedLanguage(String),

    /// A wire record matched none of the known tagged variants
    #[error("unrecognized argument shape{}", .context.as_ref().map(|c| format!(" for '{c}'")).unwrap_or_default())]
    UnrecognizedArgumentShape { context: Option<String> },

    /// An operation referenced the constant table but none was supplied
    #[error("operation references the constant table but none was provided")]
    MissingConstantTable,

    /// Circuit-operation decoding requires both raw and resolved constants
    #[error("circuit operation decoding requires a constant list and its resolved values")]
    MissingConstantContext,

    /// A constant index pointed past the end of the resolved table
    #[error("constant index {index} out of range (table length {len})")]
    ConstantIndexOutOfRange { index: usize, len: usize },

    /// A constant resolved to a different kind than the use site expects
    #[error("constant at index {index} has kind '{actual}', expected '{expected}'")]
    WrongConstantKind {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    /// A function record carried the wrong number of operands
    #[error("function '{func_type}' takes {expected} operands, but {actual} were provided")]
    InvalidFunctionArity {
        func_type: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A circuit-operation map entry decoded to a disallowed kind
    #[error("invalid {map} entry: {side} of kind '{kind}' is not allowed")]
    InvalidMapEntry {
        map: &'static str,
        side: &'static str,
        kind: &'static str,
    },

    /// No deserializer is registered for an operation's format tag
    #[error("no deserializer registered for gate id '{0}'")]
    UnknownGateId(String),

    /// Gate applied to wrong number of qubits
    #[error("gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Duplicate qubit in a gate operation
    #[error("duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Program was written by a newer format version than this codec reads
    #[error("unsupported wire format version {actual}: this codec reads up to version {expected}")]
    VersionMismatch { expected: u32, actual: u32 },

    /// Gate constructor rejected the decoded arguments
    #[error("invalid arguments for gate '{gate}': {reason}")]
    InvalidGateArgs { gate: String, reason: String },
}

impl WireError {
    /// Create an out-of-range constant index error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::ConstantIndexOutOfRange { index, len }
    }

    /// Create an invalid gate arguments error
    pub fn invalid_gate_args(gate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGateArgs {
            gate: gate.into(),
            reason: reason.into(),
        }
    }
}
