//! Function language tiers gating which operators a program may use
//!
//! Languages are ordered from least to most flexible. Producers should use
//! the least flexible language their content requires, so consumers that
//! only understand a lower tier keep working as new operators roll out.

use crate::error::WireError;
use crate::value::FunctionType;
use crate::wire::{WireArg, WireCircuit, WireConstant, WireMoment};
use crate::Result;
use std::fmt;

/// A feature tier controlling which algebraic operators are legal on the wire
///
/// The derived `Ord` follows the permissiveness order: `None < Linear < Exp`.
///
/// # Example
/// ```
/// use qwire::FunctionLanguage;
/// use qwire::value::FunctionType;
///
/// assert!(FunctionLanguage::Linear.supports(FunctionType::Add));
/// assert!(!FunctionLanguage::Linear.supports(FunctionType::Pow));
/// assert!(FunctionLanguage::None < FunctionLanguage::Exp);
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FunctionLanguage {
    /// No function trees allowed
    #[default]
    None,
    /// `add` and `mul` allowed
    Linear,
    /// `add`, `mul`, and `pow` allowed
    Exp,
}

impl FunctionLanguage {
    /// The most flexible language currently defined
    pub const MOST_PERMISSIVE: Self = Self::Exp;

    /// The name carried in a program's language declaration
    #[inline]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Linear => "linear",
            Self::Exp => "exp",
        }
    }

    /// Parse a language declaration
    ///
    /// # Errors
    /// Returns [`WireError::UnrecognizedLanguage`] for unknown names.
    pub fn from_wire_name(name: &str) -> Result<Self> {
        match name {
            "" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "exp" => Ok(Self::Exp),
            other => Err(WireError::UnrecognizedLanguage(other.to_string())),
        }
    }

    /// Whether this tier permits the given operator
    pub fn supports(&self, func_type: FunctionType) -> bool {
        match self {
            Self::None => false,
            Self::Linear => matches!(func_type, FunctionType::Add | FunctionType::Mul),
            Self::Exp => true,
        }
    }

    /// The minimal tier that admits the given operator
    pub fn minimal_for(func_type: FunctionType) -> Self {
        match func_type {
            FunctionType::Add | FunctionType::Mul => Self::Linear,
            FunctionType::Pow => Self::Exp,
        }
    }
}

impl fmt::Display for FunctionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self, Self::None) {
            f.write_str("none")
        } else {
            f.write_str(self.wire_name())
        }
    }
}

/// Infer the minimal language needed by an encoded circuit and its constants
///
/// Visits every argument of every operation in every moment (including
/// circuit-operation argument maps and any sub-circuits in the constant
/// table) and folds the minimal tier of each function node under the
/// permissiveness order. A program with no function nodes infers
/// [`FunctionLanguage::None`].
pub fn infer_function_language(circuit: &WireCircuit, constants: &[WireConstant]) -> FunctionLanguage {
    let mut lang = circuit
        .moments
        .iter()
        .fold(FunctionLanguage::None, |acc, m| acc.max(moment_language(m)));
    for constant in constants {
        if let WireConstant::Circuit(sub) = constant {
            for moment in &sub.moments {
                lang = lang.max(moment_language(moment));
            }
        }
    }
    lang
}

fn moment_language(moment: &WireMoment) -> FunctionLanguage {
    let mut lang = FunctionLanguage::None;
    for op in &moment.operations {
        for arg in op.args.values() {
            lang = lang.max(arg_language(arg));
        }
    }
    for cop in &moment.circuit_operations {
        for entry in &cop.arg_map {
            lang = lang.max(arg_language(&entry.key));
            lang = lang.max(arg_language(&entry.value));
        }
    }
    lang
}

fn arg_language(arg: &WireArg) -> FunctionLanguage {
    match &arg.func {
        Some(func) => {
            let mut lang = FunctionType::from_wire_tag(&func.func_type)
                .map(FunctionLanguage::minimal_for)
                .unwrap_or(FunctionLanguage::None);
            for operand in &func.args {
                lang = lang.max(arg_language(operand));
            }
            lang
        }
        None => FunctionLanguage::None,
    }
}
