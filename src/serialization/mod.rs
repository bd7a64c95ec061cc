//! Program serialization: expression codec, operation deserializers, and the
//! whole-program wire codec with its constant table
//!
//! Encoding and decoding are pure and synchronous. Within one program decode
//! the constant table is resolved in a single forward pass (entries only
//! reference earlier entries); once built it is read-only.

pub mod args;
pub mod op;
pub mod program;


pub use args::{arg_from_wire, arg_to_wire, float_arg_from_wire, float_arg_to_wire};
pub use op::{ArgMap, CircuitOpDeserializer, DeserializingArg, GateOpDeserializer, ResolvedConstant};
pub use program::ProgramSerializer;

/// Wire format version written into every program
pub const WIRE_FORMAT_VERSION: u32 = 1;
