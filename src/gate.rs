//! Gate trait and gate operations

use crate::error::WireError;
use crate::qubit::QubitId;
use crate::value::ArgValue;
use crate::Result;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Trait for quantum gates known to the codec
///
/// Gates are stateless, shareable values. Beyond identity and arity, a gate
/// exposes its wire identity: the format tag its operation records carry and
/// the named argument values the encoder writes for it.
///
/// # Example
/// ```
/// use qwire::{ArgValue, Gate};
///
/// #[derive(Debug)]
/// struct XPow { exponent: ArgValue }
///
/// impl Gate for XPow {
///     fn name(&self) -> &str { "XPow" }
///     fn num_qubits(&self) -> usize { 1 }
///     fn wire_id(&self) -> &str { "x_pow" }
///     fn wire_args(&self) -> Vec<(String, ArgValue)> {
///         vec![("exponent".to_string(), self.exponent.clone())]
///     }
/// }
/// ```
pub trait Gate: Send + Sync + fmt::Debug {
    /// The display name of the gate (e.g., "H", "CNOT", "XPow")
    fn name(&self) -> &str;

    /// Number of qubits this gate acts on
    fn num_qubits(&self) -> usize;

    /// The format tag used for this gate's operation records
    fn wire_id(&self) -> &str;

    /// Named argument values written into the operation record
    ///
    /// Parameterless gates return an empty list.
    fn wire_args(&self) -> Vec<(String, ArgValue)> {
        Vec::new()
    }
}

/// A gate applied to specific qubits, with an optional calibration token
///
/// # Example
/// ```
/// # use qwire::{ArgValue, Gate, GateOp, QubitId};
/// # use std::sync::Arc;
/// # #[derive(Debug)]
/// # struct DummyGate;
/// # impl Gate for DummyGate {
/// #     fn name(&self) -> &str { "DUMMY" }
/// #     fn num_qubits(&self) -> usize { 1 }
/// #     fn wire_id(&self) -> &str { "dummy" }
/// # }
/// let op = GateOp::new(Arc::new(DummyGate), &[QubitId::new(0)]).unwrap();
/// assert_eq!(op.qubits().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct GateOp {
    gate: Arc<dyn Gate>,
    qubits: SmallVec<[QubitId; 2]>, // Most gates are 1-2 qubits
    token: Option<String>,
}

impl GateOp {
    /// Create a new gate operation
    ///
    /// # Errors
    /// Returns error if:
    /// - Qubit count doesn't match gate requirements
    /// - Duplicate qubits specified
    pub fn new(gate: Arc<dyn Gate>, qubits: &[QubitId]) -> Result<Self> {
        if qubits.len() != gate.num_qubits() {
            return Err(WireError::InvalidQubitCount {
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                actual: qubits.len(),
            });
        }

        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(WireError::DuplicateQubit(qubits[i]));
                }
            }
        }

        Ok(Self {
            gate,
            qubits: SmallVec::from_slice(qubits),
            token: None,
        })
    }

    /// Builder pattern: attach a calibration token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The gate being applied
    #[inline]
    pub fn gate(&self) -> &Arc<dyn Gate> {
        &self.gate
    }

    /// Target qubits, in application order
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Attached calibration token, if any
    #[inline]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.gate.name())?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MockGate {
        name: String,
        num_qubits: usize,
    }

    impl Gate for MockGate {
        fn name(&self) -> &str {
            &self.name
        }

        fn num_qubits(&self) -> usize {
            self.num_qubits
        }

        fn wire_id(&self) -> &str {
            "mock"
        }
    }

    fn mock(num_qubits: usize) -> Arc<dyn Gate> {
        Arc::new(MockGate {
            name: "MOCK".to_string(),
            num_qubits,
        })
    }

    #[test]
    fn test_gate_op_creation() {
        let op = GateOp::new(mock(2), &[QubitId::new(0), QubitId::new(1)]).unwrap();
        assert_eq!(op.qubits(), &[QubitId::new(0), QubitId::new(1)]);
        assert!(op.token().is_none());
    }

    #[test]
    fn test_wrong_qubit_count() {
        let err = GateOp::new(mock(2), &[QubitId::new(0)]).unwrap_err();
        assert!(matches!(err, WireError::InvalidQubitCount { .. }));
    }

    #[test]
    fn test_duplicate_qubits() {
        let err = GateOp::new(mock(2), &[QubitId::new(1), QubitId::new(1)]).unwrap_err();
        assert!(matches!(err, WireError::DuplicateQubit(_)));
    }

    #[test]
    fn test_token_builder() {
        let op = GateOp::new(mock(1), &[QubitId::new(0)])
            .unwrap()
            .with_token("cal_2026");
        assert_eq!(op.token(), Some("cal_2026"));
    }

    #[test]
    fn test_display() {
        let op = GateOp::new(mock(2), &[QubitId::new(0), QubitId::new(3)]).unwrap();
        assert_eq!(format!("{}", op), "MOCK(q0, q3)");
    }
}
