//! Expression codec: argument values to and from wire records
//!
//! The full shape ([`WireArg`]) carries numbers, strings, boolean lists,
//! symbols, and function trees. The float-only shape ([`WireFloatArg`])
//! carries numbers, symbols, and function trees; strings and boolean lists
//! are categorically rejected there. Function trees are gated by the active
//! [`FunctionLanguage`] on both encode and decode.

use crate::error::WireError;
use crate::lang::FunctionLanguage;
use crate::value::{ArgValue, FunctionType};
use crate::wire::{WireArg, WireFloatArg, WireFunction};
use crate::Result;

/// Encode an argument value into a full wire record
///
/// `language` of `None` is the unrestricted pseudo-tier used while the
/// program's minimal language is still being inferred; it permits every
/// operator and is never written to the wire itself.
///
/// # Errors
/// [`WireError::UnsupportedFunction`] if a function node uses an operator
/// outside the language's permitted set.
pub fn arg_to_wire(value: &ArgValue, language: Option<FunctionLanguage>) -> Result<WireArg> {
    match value {
        ArgValue::Int(i) => Ok(WireArg::float(*i as f64)),
        ArgValue::Float(f) => Ok(WireArg::float(*f)),
        ArgValue::Str(s) => Ok(WireArg::string(s.clone())),
        ArgValue::BoolList(bs) => Ok(WireArg::bools(bs.clone())),
        ArgValue::Symbol(name) => Ok(WireArg::symbol(name.clone())),
        ArgValue::Func(_) => {
            let func = expr_to_wire(value, language, "full")?;
            Ok(WireArg {
                func: Some(func),
                ..Default::default()
            })
        }
    }
}

/// Encode an argument value into a float-only wire record
///
/// Symbols and function trees pass through structurally, exactly as in the
/// full shape; only strings and boolean lists are rejected.
///
/// # Errors
/// [`WireError::UnsupportedArgValue`] for strings and boolean lists;
/// [`WireError::UnsupportedFunction`] for operators outside the language.
pub fn float_arg_to_wire(
    value: &ArgValue,
    language: Option<FunctionLanguage>,
) -> Result<WireFloatArg> {
    match value {
        ArgValue::Int(i) => Ok(WireFloatArg {
            float_value: Some(*i as f64),
            ..Default::default()
        }),
        ArgValue::Float(f) => Ok(WireFloatArg {
            float_value: Some(*f),
            ..Default::default()
        }),
        ArgValue::Symbol(name) => Ok(WireFloatArg {
            symbol: Some(name.clone()),
            ..Default::default()
        }),
        ArgValue::Func(_) => {
            let func = expr_to_wire(value, language, "float-only")?;
            Ok(WireFloatArg {
                func: Some(func),
                ..Default::default()
            })
        }
        other => Err(WireError::UnsupportedArgValue {
            kind: other.kind(),
            shape: "float-only",
        }),
    }
}

fn expr_to_wire(
    value: &ArgValue,
    language: Option<FunctionLanguage>,
    shape: &'static str,
) -> Result<WireFunction> {
    let func = match value {
        ArgValue::Func(func) => func,
        other => {
            return Err(WireError::UnsupportedArgValue {
                kind: other.kind(),
                shape,
            })
        }
    };
    let permitted = language.map_or(true, |lang| lang.supports(func.func_type));
    if !permitted {
        return Err(WireError::UnsupportedFunction {
            func_type: func.func_type.as_str().to_string(),
            language: language_label(language),
        });
    }
    // Operands always use the full shape, even under a float-only parent.
    let args = func
        .args
        .iter()
        .map(|arg| arg_to_wire(arg, language))
        .collect::<Result<Vec<_>>>()?;
    Ok(WireFunction {
        func_type: func.func_type.as_str().to_string(),
        args,
    })
}

/// Decode a full wire record into an argument value
///
/// `arg` of `None` models an absent field: with `required_arg_name` set this
/// is [`WireError::MissingRequiredArgument`], otherwise `Ok(None)`. The same
/// rule applies to a record present on the wire but with no field set.
///
/// # Errors
/// [`WireError::UnrecognizedFunction`] if a function record's operator is
/// unknown or outside the declared language (re-validated on decode);
/// [`WireError::UnrecognizedArgumentShape`] if the scalar payload matches no
/// known variant.
pub fn arg_from_wire(
    arg: Option<&WireArg>,
    language: FunctionLanguage,
    required_arg_name: Option<&str>,
) -> Result<Option<ArgValue>> {
    let arg = match arg {
        Some(arg) => arg,
        None => return absent(required_arg_name),
    };

    if let Some(value) = &arg.arg_value {
        if let Some(f) = value.float_value {
            return Ok(Some(ArgValue::from_float(f)));
        }
        if let Some(bools) = &value.bool_values {
            return Ok(Some(ArgValue::BoolList(bools.clone())));
        }
        if let Some(s) = &value.string_value {
            return Ok(Some(ArgValue::Str(s.clone())));
        }
        return Err(WireError::UnrecognizedArgumentShape {
            context: required_arg_name.map(String::from),
        });
    }
    if let Some(symbol) = &arg.symbol {
        return Ok(Some(ArgValue::Symbol(symbol.clone())));
    }
    if let Some(func) = &arg.func {
        return Ok(Some(func_from_wire(func, language)?));
    }
    absent(required_arg_name)
}

/// Decode a float-only wire record into an argument value
///
/// Numeric values normalize to [`ArgValue::Int`] when exactly integral.
pub fn float_arg_from_wire(
    arg: Option<&WireFloatArg>,
    language: FunctionLanguage,
    required_arg_name: Option<&str>,
) -> Result<Option<ArgValue>> {
    let arg = match arg {
        Some(arg) => arg,
        None => return absent(required_arg_name),
    };

    if let Some(f) = arg.float_value {
        return Ok(Some(ArgValue::from_float(f)));
    }
    if let Some(symbol) = &arg.symbol {
        return Ok(Some(ArgValue::Symbol(symbol.clone())));
    }
    if let Some(func) = &arg.func {
        return Ok(Some(func_from_wire(func, language)?));
    }
    absent(required_arg_name)
}

fn absent(required_arg_name: Option<&str>) -> Result<Option<ArgValue>> {
    match required_arg_name {
        Some(name) => Err(WireError::MissingRequiredArgument(name.to_string())),
        None => Ok(None),
    }
}

fn func_from_wire(func: &WireFunction, language: FunctionLanguage) -> Result<ArgValue> {
    let func_type = FunctionType::from_wire_tag(&func.func_type)
        .filter(|ft| language.supports(*ft))
        .ok_or_else(|| WireError::UnrecognizedFunction {
            func_type: func.func_type.clone(),
            language: language.to_string(),
        })?;

    let operand_name = match func_type {
        FunctionType::Add => "an addition operand",
        FunctionType::Mul => "a multiplication operand",
        FunctionType::Pow => "a power operand",
    };
    let mut operands = Vec::with_capacity(func.args.len());
    for arg in &func.args {
        let value = arg_from_wire(Some(arg), language, Some(operand_name))?
            .ok_or_else(|| WireError::MissingRequiredArgument(operand_name.to_string()))?;
        operands.push(value);
    }

    match func_type {
        FunctionType::Add => Ok(ArgValue::add(operands)),
        FunctionType::Mul => Ok(ArgValue::mul(operands)),
        FunctionType::Pow => {
            if operands.len() != 2 {
                return Err(WireError::InvalidFunctionArity {
                    func_type: "pow",
                    expected: 2,
                    actual: operands.len(),
                });
            }
            let mut operands = operands.into_iter();
            let base = operands.next().unwrap_or(ArgValue::Int(0));
            let exponent = operands.next().unwrap_or(ArgValue::Int(0));
            Ok(ArgValue::pow(base, exponent))
        }
    }
}

fn language_label(language: Option<FunctionLanguage>) -> String {
    match language {
        Some(lang) => lang.to_string(),
        None => "[any]".to_string(),
    }
}
