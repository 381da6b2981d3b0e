#![no_main]

use graalfuzz::{
    scan_inputs, source_lines, InputSample, InputType, Sampling, MAX_RANDOM_INT,
};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|data: &[u8]| {
    if data.len() > 32 * 1024 {
        return;
    }
    let src = String::from_utf8_lossy(data);
    let line_count = source_lines(&src).count();
    let specs = scan_inputs(&src, Sampling::Randomized, &mut StdRng::seed_from_u64(0));

    let mut previous = 0;
    for spec in &specs {
        assert!(spec.line_num > previous && spec.line_num <= line_count);
        previous = spec.line_num;
        match (spec.ty, spec.sample) {
            (InputType::Boolean, InputSample::Boolean(_)) => {}
            (InputType::Integer, InputSample::Integer(value)) => {
                assert!((0..=MAX_RANDOM_INT).contains(&value));
            }
            other => panic!("sample does not match its type: {other:?}"),
        }
    }
});
