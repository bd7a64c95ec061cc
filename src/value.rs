//! Argument values: numbers, symbols, and algebraic function trees

use std::fmt;

/// Algebraic operators allowed in argument function trees
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FunctionType {
    /// N-ary addition
    Add,
    /// N-ary multiplication
    Mul,
    /// Binary exponentiation (base, exponent)
    Pow,
}

impl FunctionType {
    /// The tag written to the wire for this operator
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Mul => "mul",
            Self::Pow => "pow",
        }
    }

    /// Parse a wire tag; returns `None` for unknown operators
    pub fn from_wire_tag(tag: &str) -> Option<Self> {
        match tag {
            "add" => Some(Self::Add),
            "mul" => Some(Self::Mul),
            "pow" => Some(Self::Pow),
            _ => None,
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function node in an argument expression tree
///
/// Operand order is significant at the representation level, even for
/// mathematically commutative operators.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgFunction {
    pub func_type: FunctionType,
    pub args: Vec<ArgValue>,
}

/// An argument value attached to an operation
///
/// Numbers normalize to `Int` when exactly representable as an integer
/// (applied on decode); `Symbol` is a named free variable; `Func` is a
/// finite, immutable expression tree over the other variants.
///
/// # Example
/// ```
/// use qwire::ArgValue;
///
/// // 2*x + 1
/// let expr = ArgValue::add(vec![
///     ArgValue::mul(vec![ArgValue::Int(2), ArgValue::Symbol("x".into())]),
///     ArgValue::Int(1),
/// ]);
/// assert!(matches!(expr, ArgValue::Func(_)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    /// Exact integer value
    Int(i64),
    /// General floating-point value
    Float(f64),
    /// Named free variable
    Symbol(String),
    /// Ordered sequence of booleans
    BoolList(Vec<bool>),
    /// Plain string value
    Str(String),
    /// Algebraic function over other argument values
    Func(ArgFunction),
}

impl ArgValue {
    /// Build an n-ary addition node; operand order is preserved
    pub fn add(args: Vec<ArgValue>) -> Self {
        Self::Func(ArgFunction {
            func_type: FunctionType::Add,
            args,
        })
    }

    /// Build an n-ary multiplication node; operand order is preserved
    pub fn mul(args: Vec<ArgValue>) -> Self {
        Self::Func(ArgFunction {
            func_type: FunctionType::Mul,
            args,
        })
    }

    /// Build a power node from base and exponent
    pub fn pow(base: ArgValue, exponent: ArgValue) -> Self {
        Self::Func(ArgFunction {
            func_type: FunctionType::Pow,
            args: vec![base, exponent],
        })
    }

    /// Normalize a decoded float: exact-integer values become `Int`
    pub fn from_float(value: f64) -> Self {
        if value.is_finite() && value.round() == value && value.abs() < i64::MAX as f64 {
            Self::Int(value as i64)
        } else {
            Self::Float(value)
        }
    }

    /// The numeric value of `Int`/`Float` variants
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Short kind name used in error reporting
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Symbol(_) => "symbol",
            Self::BoolList(_) => "bool_list",
            Self::Str(_) => "string",
            Self::Func(_) => "function",
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Symbol(s) => write!(f, "{}", s),
            Self::BoolList(bs) => write!(f, "{:?}", bs),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Func(func) => {
                write!(f, "{}(", func.func_type)?;
                for (i, arg) in func.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
