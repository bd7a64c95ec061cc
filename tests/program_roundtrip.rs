//! End-to-end program encode/decode tests

use qwire::serialization::{DeserializingArg, GateOpDeserializer, ProgramSerializer};
use qwire::wire::{WireArg, WireProgram};
use qwire::{
    ArgValue, Circuit, CircuitOp, FunctionLanguage, Gate, GateOp, Operation, QubitId, Repetition,
    WireError,
};
use std::sync::Arc;

#[derive(Debug)]
struct XPow {
    exponent: ArgValue,
}

impl Gate for XPow {
    fn name(&self) -> &str {
        "XPow"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn wire_id(&self) -> &str {
        "x_pow"
    }

    fn wire_args(&self) -> Vec<(String, ArgValue)> {
        vec![("exponent".to_string(), self.exponent.clone())]
    }
}

#[derive(Debug)]
struct Meas {
    key: String,
    invert_mask: Vec<bool>,
    num_qubits: usize,
}

impl Gate for Meas {
    fn name(&self) -> &str {
        "Meas"
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn wire_id(&self) -> &str {
        "meas"
    }

    fn wire_args(&self) -> Vec<(String, ArgValue)> {
        vec![
            ("key".to_string(), ArgValue::Str(self.key.clone())),
            (
                "invert_mask".to_string(),
                ArgValue::BoolList(self.invert_mask.clone()),
            ),
        ]
    }
}

fn x_pow_deserializer() -> GateOpDeserializer {
    GateOpDeserializer::new("x_pow", |args| {
        let exponent = args.get("exponent").cloned().unwrap_or(ArgValue::Int(1));
        Ok(Arc::new(XPow { exponent }) as Arc<dyn Gate>)
    })
    .with_arg(DeserializingArg::required("exponent", "exponent").with_default(ArgValue::Int(1)))
}

fn meas_deserializer() -> GateOpDeserializer {
    GateOpDeserializer::new("meas", |args| {
        let key = match args.get("key") {
            Some(ArgValue::Str(key)) => key.clone(),
            _ => return Err(WireError::invalid_gate_args("meas", "key must be a string")),
        };
        let invert_mask = match args.get("invert_mask") {
            Some(ArgValue::BoolList(mask)) => mask.clone(),
            None => Vec::new(),
            _ => {
                return Err(WireError::invalid_gate_args(
                    "meas",
                    "invert_mask must be a boolean list",
                ))
            }
        };
        let num_qubits = match args.get("num_qubits") {
            Some(ArgValue::Int(n)) => *n as usize,
            _ => return Err(WireError::invalid_gate_args("meas", "num_qubits missing")),
        };
        Ok(Arc::new(Meas {
            key,
            invert_mask,
            num_qubits,
        }) as Arc<dyn Gate>)
    })
    .with_args(vec![
        DeserializingArg::required("key", "key"),
        DeserializingArg::optional("invert_mask", "invert_mask"),
    ])
    .with_num_qubits_param("num_qubits")
}

fn serializer() -> ProgramSerializer {
    ProgramSerializer::new()
        .with_deserializer(x_pow_deserializer())
        .with_deserializer(meas_deserializer())
}

fn x_pow_op(qubit: usize, exponent: ArgValue) -> GateOp {
    GateOp::new(Arc::new(XPow { exponent }), &[QubitId::new(qubit)]).unwrap()
}

fn assert_gate_ops_equal(actual: &Operation, expected: &GateOp) {
    match actual {
        Operation::Gate(op) => {
            assert_eq!(op.gate().wire_id(), expected.gate().wire_id());
            assert_eq!(op.qubits(), expected.qubits());
            assert_eq!(op.gate().wire_args(), expected.gate().wire_args());
            assert_eq!(op.token(), expected.token());
        }
        other => panic!("expected gate operation, got {}", other),
    }
}

#[test]
fn test_gate_program_round_trip() {
    let expr = ArgValue::add(vec![
        ArgValue::mul(vec![ArgValue::Int(2), ArgValue::Symbol("x".into())]),
        ArgValue::Int(1),
    ]);
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, expr));
    circuit.push(
        GateOp::new(
            Arc::new(Meas {
                key: "m0".to_string(),
                invert_mask: vec![true, false],
                num_qubits: 2,
            }),
            &[QubitId::new(0), QubitId::new(1)],
        )
        .unwrap(),
    );

    let program = serializer().serialize(&circuit, None).unwrap();
    // Only add/mul appear, so the minimal language is inferred.
    assert_eq!(program.language.arg_function_language, "linear");
    assert_eq!(program.circuit.moments.len(), 2);

    let decoded = serializer().deserialize(&program).unwrap();
    assert_eq!(decoded.len(), 2);
    match (&decoded.operations()[0], &circuit.operations()[0]) {
        (actual, Operation::Gate(expected)) => assert_gate_ops_equal(actual, expected),
        _ => unreachable!(),
    }
    match (&decoded.operations()[1], &circuit.operations()[1]) {
        (actual, Operation::Gate(expected)) => assert_gate_ops_equal(actual, expected),
        _ => unreachable!(),
    }
}

#[test]
fn test_explicit_language_is_stamped_and_enforced() {
    let pow = ArgValue::pow(ArgValue::Symbol("s".into()), ArgValue::Int(3));
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, pow));

    let err = serializer()
        .serialize(&circuit, Some(FunctionLanguage::Linear))
        .unwrap_err();
    assert!(matches!(err, WireError::UnsupportedFunction { .. }));

    let program = serializer()
        .serialize(&circuit, Some(FunctionLanguage::Exp))
        .unwrap();
    assert_eq!(program.language.arg_function_language, "exp");
}

#[test]
fn test_inferred_language_none_without_functions() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, ArgValue::Float(0.5)));
    let program = serializer().serialize(&circuit, None).unwrap();
    assert_eq!(program.language.arg_function_language, "");
}

#[test]
fn test_decode_rejects_function_above_declared_language() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(
        0,
        ArgValue::add(vec![ArgValue::Symbol("x".into()), ArgValue::Int(1)]),
    ));
    let mut program = serializer().serialize(&circuit, None).unwrap();
    assert_eq!(program.language.arg_function_language, "linear");

    // A consumer honoring a stricter declaration must reject the record.
    program.language.arg_function_language = String::new();
    let err = serializer().deserialize(&program).unwrap_err();
    assert!(matches!(err, WireError::UnrecognizedFunction { .. }));
}

#[test]
fn test_token_round_trip() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, ArgValue::Int(1)).with_token("cal_2026_08"));
    let program = serializer().serialize(&circuit, None).unwrap();
    let decoded = serializer().deserialize(&program).unwrap();
    match &decoded.operations()[0] {
        Operation::Gate(op) => assert_eq!(op.token(), Some("cal_2026_08")),
        other => panic!("expected gate operation, got {}", other),
    }
}

#[test]
fn test_shared_subcircuit_deduplicated() {
    let mut sub = Circuit::new();
    sub.push(x_pow_op(0, ArgValue::Int(1)));
    let frozen = sub.freeze();

    let mut circuit = Circuit::new();
    circuit.push(CircuitOp::new(Arc::clone(&frozen)).with_repetition(Repetition::Count(2)));
    circuit.push(
        CircuitOp::new(Arc::clone(&frozen))
            .with_repetition(Repetition::Ids(vec!["a".into(), "b".into(), "c".into()]))
            .with_qubit_map(vec![(QubitId::new(0), QubitId::new(1))])
            .with_measurement_key_map(vec![("m0".to_string(), "m1".to_string())])
            .with_arg_map(vec![(
                ArgValue::Symbol("x".into()),
                ArgValue::Float(0.25),
            )]),
    );

    let program = serializer().serialize(&circuit, None).unwrap();
    // Both uses reference one constant-table entry.
    assert_eq!(program.constants.len(), 1);
    let indices: Vec<usize> = program
        .circuit
        .moments
        .iter()
        .flat_map(|m| &m.circuit_operations)
        .map(|op| op.circuit_constant_index)
        .collect();
    assert_eq!(indices, vec![0, 0]);

    let decoded = serializer().deserialize(&program).unwrap();
    assert_eq!(decoded.len(), 2);
    match &decoded.operations()[1] {
        Operation::Circuit(op) => {
            assert_eq!(op.repetition.repetitions(), 3);
            assert_eq!(op.qubit_map, vec![(QubitId::new(0), QubitId::new(1))]);
            assert_eq!(
                op.measurement_key_map,
                vec![("m0".to_string(), "m1".to_string())]
            );
            assert_eq!(
                op.arg_map,
                vec![(ArgValue::Symbol("x".into()), ArgValue::Float(0.25))]
            );
            assert_eq!(op.circuit.operations().len(), 1);
        }
        other => panic!("expected circuit operation, got {}", other),
    }

    // Within one decode, both operations share the same resolved circuit.
    match (&decoded.operations()[0], &decoded.operations()[1]) {
        (Operation::Circuit(a), Operation::Circuit(b)) => {
            assert!(Arc::ptr_eq(&a.circuit, &b.circuit));
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_nested_subcircuits_reference_backward() {
    let mut inner = Circuit::new();
    inner.push(x_pow_op(0, ArgValue::Symbol("t".into())));
    let inner = inner.freeze();

    let mut outer = Circuit::new();
    outer.push(CircuitOp::new(inner));
    let outer = outer.freeze();

    let mut top = Circuit::new();
    top.push(CircuitOp::new(outer).with_repetition(Repetition::Count(5)));

    let program = serializer().serialize(&top, None).unwrap();
    // Inner circuit lands before the outer one that references it.
    assert_eq!(program.constants.len(), 2);
    let top_index = program.circuit.moments[0].circuit_operations[0].circuit_constant_index;
    assert_eq!(top_index, 1);

    let decoded = serializer().deserialize(&program).unwrap();
    match &decoded.operations()[0] {
        Operation::Circuit(op) => {
            assert_eq!(op.repetition, Repetition::Count(5));
            match &op.circuit.operations()[0] {
                Operation::Circuit(nested) => {
                    assert_eq!(nested.circuit.operations().len(), 1);
                }
                other => panic!("expected nested circuit operation, got {}", other),
            }
        }
        other => panic!("expected circuit operation, got {}", other),
    }
}

#[test]
fn test_program_json_round_trip() {
    let mut sub = Circuit::new();
    sub.push(x_pow_op(0, ArgValue::Symbol("t".into())));
    let mut circuit = Circuit::new();
    circuit.push(CircuitOp::new(sub.freeze()));
    circuit.push(x_pow_op(1, ArgValue::Float(0.5)).with_token("cal"));

    let program = serializer().serialize(&circuit, None).unwrap();
    let json = serde_json::to_string(&program).unwrap();
    let reparsed: WireProgram = serde_json::from_str(&json).unwrap();
    assert_eq!(program, reparsed);

    let decoded = serializer().deserialize(&reparsed).unwrap();
    assert_eq!(decoded.len(), 2);
}

#[test]
fn test_unknown_gate_id_rejected() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, ArgValue::Int(1)));
    let mut program = serializer().serialize(&circuit, None).unwrap();
    program.circuit.moments[0].operations[0].gate_id = "mystery".to_string();

    let err = serializer().deserialize(&program).unwrap_err();
    assert!(matches!(err, WireError::UnknownGateId(id) if id == "mystery"));
}

#[test]
fn test_newer_version_rejected() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, ArgValue::Int(1)));
    let mut program = serializer().serialize(&circuit, None).unwrap();
    program.version += 1;

    let err = serializer().deserialize(&program).unwrap_err();
    assert!(matches!(err, WireError::VersionMismatch { .. }));
}

#[test]
fn test_unknown_language_declaration_rejected() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, ArgValue::Int(1)));
    let mut program = serializer().serialize(&circuit, None).unwrap();
    program.language.arg_function_language = "quadratic".to_string();

    let err = serializer().deserialize(&program).unwrap_err();
    assert!(matches!(err, WireError::UnrecognizedLanguage(_)));
}

#[test]
fn test_default_applies_when_arg_missing() {
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(0, ArgValue::Int(1)));
    let mut program = serializer().serialize(&circuit, None).unwrap();
    program.circuit.moments[0].operations[0].args.clear();

    let decoded = serializer().deserialize(&program).unwrap();
    match &decoded.operations()[0] {
        Operation::Gate(op) => {
            assert_eq!(
                op.gate().wire_args(),
                vec![("exponent".to_string(), ArgValue::Int(1))]
            );
        }
        other => panic!("expected gate operation, got {}", other),
    }
}

#[test]
fn test_required_arg_missing_fails() {
    let mut circuit = Circuit::new();
    circuit.push(
        GateOp::new(
            Arc::new(Meas {
                key: "m".to_string(),
                invert_mask: vec![],
                num_qubits: 1,
            }),
            &[QubitId::new(0)],
        )
        .unwrap(),
    );
    let mut program = serializer().serialize(&circuit, None).unwrap();
    program.circuit.moments[0].operations[0].args.remove("key");

    let err = serializer().deserialize(&program).unwrap_err();
    assert!(matches!(err, WireError::MissingRequiredArgument(name) if name == "key"));
}

#[test]
fn test_args_survive_as_wire_functions() {
    // Spot-check the wire structure of a symbolic argument.
    let mut circuit = Circuit::new();
    circuit.push(x_pow_op(
        0,
        ArgValue::mul(vec![ArgValue::Int(2), ArgValue::Symbol("x".into())]),
    ));
    let program = serializer().serialize(&circuit, None).unwrap();
    let arg = &program.circuit.moments[0].operations[0].args["exponent"];
    let expected = WireArg::function("mul", vec![WireArg::float(2.0), WireArg::symbol("x")]);
    assert_eq!(arg, &expected);
}
