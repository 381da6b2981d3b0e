#![no_main]

use graalfuzz::{source_lines, HarnessIds, HarnessLayout};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|data: &[u8]| {
    if data.len() > 32 * 1024 {
        return;
    }
    let src = String::from_utf8_lossy(data);
    let ids = HarnessIds::generate(&mut StdRng::seed_from_u64(data.len() as u64));
    let rendered = HarnessLayout::new(&src, ids).render();
    let lines: Vec<&str> = rendered.text.lines().collect();
    let positions = rendered.positions;

    // Reported positions must agree with the text as written.
    assert!(lines[positions.loop_line - 1].starts_with("while (true) { //"));
    assert!(lines[positions.fault_line - 1].starts_with("} catch (ex_"));
    let source_len = source_lines(&src).count();
    assert_eq!(positions.fault_line, positions.line_offset + source_len + 1);
    assert_eq!(lines.len(), positions.fault_line + 3);
});
