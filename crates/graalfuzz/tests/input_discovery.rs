use graalfuzz::{
    discover_inputs, synthesize_program, FuzzError, InputSample, InputType, ProgramShape,
    Sampling, SizeRange, SymbolPool, MAX_RANDOM_INT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SOURCE: &str = "\
function check(a, b) {
\treturn a && b > 3;
}

var x = true; // input
var z = true; // not input
function Holder() {
}
this.y = 42; // input
print(check(x, y));
";

#[test]
fn finds_tagged_declarations_in_source_order() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("inputs.js");
    std::fs::write(&path, SOURCE).expect("write");

    let specs = discover_inputs(&path, Sampling::Randomized, &mut StdRng::seed_from_u64(8))
        .expect("discover");
    assert_eq!(specs.len(), 2, "{specs:?}");

    assert_eq!(specs[0].line_num, 5);
    assert_eq!(specs[0].name, "x");
    assert_eq!(specs[0].ty, InputType::Boolean);
    assert!(matches!(specs[0].sample, InputSample::Boolean(_)));

    assert_eq!(specs[1].line_num, 9);
    assert_eq!(specs[1].name, "y");
    assert_eq!(specs[1].ty, InputType::Integer);
    let InputSample::Integer(value) = specs[1].sample else {
        panic!("expected an integer sample, got {:?}", specs[1].sample);
    };
    assert!((0..=MAX_RANDOM_INT).contains(&value));
}

#[test]
fn fixed_sampling_is_identical_across_runs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("inputs.js");
    std::fs::write(&path, SOURCE).expect("write");

    let first = discover_inputs(&path, Sampling::Fixed, &mut StdRng::seed_from_u64(1))
        .expect("first");
    let second = discover_inputs(&path, Sampling::Fixed, &mut StdRng::from_entropy())
        .expect("second");
    assert_eq!(first, second);
    assert_eq!(first[0].sample, InputSample::Boolean(true));
    assert_eq!(first[1].sample, InputSample::Integer(42));
}

#[test]
fn no_matches_is_an_empty_list() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("plain.js");
    std::fs::write(&path, "print('hello');\n").expect("write");
    let specs = discover_inputs(&path, Sampling::Fixed, &mut StdRng::seed_from_u64(0))
        .expect("discover");
    assert!(specs.is_empty());
}

#[test]
fn unreadable_source_propagates() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let err = discover_inputs(
        &tmp.path().join("missing.js"),
        Sampling::Fixed,
        &mut StdRng::seed_from_u64(0),
    )
    .expect_err("missing file");
    assert!(matches!(err, FuzzError::Source { .. }), "{err:?}");
}

#[test]
fn generated_programs_expose_their_typed_inputs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("generated.js");
    let mut rng = StdRng::seed_from_u64(21);
    let shape = ProgramShape {
        blocks: SizeRange::exactly(2),
        guard: graalfuzz::ExpressionShape {
            input_vars: SizeRange::exactly(1),
            const_vars: SizeRange::exactly(1),
            literals: SizeRange::exactly(1),
        },
    };
    let program = synthesize_program(&mut rng, &SymbolPool::javascript(), &shape);
    std::fs::write(&path, program.to_source()).expect("write");

    let specs = discover_inputs(&path, Sampling::Fixed, &mut rng).expect("discover");
    let found: Vec<(&str, InputType)> = specs.iter().map(|s| (s.name.as_str(), s.ty)).collect();
    assert_eq!(
        found,
        [
            ("input_number_integer", InputType::Integer),
            ("input_boolean", InputType::Boolean),
        ]
    );
}
