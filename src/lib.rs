//! Wire-format codec for quantum circuit programs
//!
//! This crate maps in-memory circuit operations and their parameter
//! expressions to and from a versioned wire format:
//! - [`ArgValue`]: numbers, symbols, and algebraic function trees
//! - [`FunctionLanguage`]: feature tiers gating which operators may appear
//! - [`ProgramSerializer`]: whole-program encode/decode with a shared
//!   constant table for deduplicated sub-circuits
//!
//! # Example
//! ```
//! use qwire::{ArgValue, FunctionLanguage};
//! use qwire::serialization::{arg_to_wire, arg_from_wire};
//!
//! // 2*x + 1, encoded under the "linear" tier
//! let expr = ArgValue::add(vec![
//!     ArgValue::mul(vec![ArgValue::Int(2), ArgValue::Symbol("x".into())]),
//!     ArgValue::Int(1),
//! ]);
//! let wire = arg_to_wire(&expr, Some(FunctionLanguage::Linear)).unwrap();
//! let back = arg_from_wire(Some(&wire), FunctionLanguage::Linear, None).unwrap();
//! assert_eq!(back, Some(expr));
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod lang;
pub mod qubit;
pub mod serialization;
pub mod value;
pub mod wire;

// Re-exports for convenience
pub use circuit::{Circuit, CircuitOp, FrozenCircuit, Operation, Repetition};
pub use error::WireError;
pub use gate::{Gate, GateOp};
pub use lang::FunctionLanguage;
pub use qubit::QubitId;
pub use serialization::ProgramSerializer;
pub use value::{ArgFunction, ArgValue, FunctionType};

/// Type alias for results in qwire
pub type Result<T> = std::result::Result<T, WireError>;
