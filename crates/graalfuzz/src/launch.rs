//! Thin process glue around an external JavaScript engine.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use rand::Rng;

use crate::config::EngineConfig;
use crate::expr::probe_statement;
use crate::harness::HarnessRecord;
use crate::pool::SymbolPool;
use crate::range::SizeRange;
use crate::FuzzError;

/// `--fuzzingtool.*` options that hand a harness record to the
/// engine-side instrumentation, followed by the harness path.
pub fn harness_arguments(record: &HarnessRecord, option_file: Option<&Path>) -> Vec<String> {
    let mut args = vec![
        format!("--fuzzingtool.mainLoopLineNumber={}", record.loop_line),
        format!("--fuzzingtool.mainLoopIdentString={}", record.loop_id),
        format!("--fuzzingtool.errorLineNumber={}", record.fault_line),
        format!("--fuzzingtool.errorIdentString={}", record.fault_id),
        format!("--fuzzingtool.sourceCodeLineOffset={}", record.line_offset),
    ];
    if let Some(option_file) = option_file {
        args.push(format!("--fuzzingtool.optionFile={}", option_file.display()));
    }
    args.push(record.path.display().to_string());
    args
}

/// Runs the engine on a harness and waits for it to exit.
pub fn run_harness(
    engine: &EngineConfig,
    record: &HarnessRecord,
    option_file: Option<&Path>,
) -> Result<ExitStatus, FuzzError> {
    let args = harness_arguments(record, option_file);
    tracing::info!(engine = %engine.command, harness = %record.path.display(), "launching engine");
    Command::new(&engine.command)
        .args(&engine.args)
        .args(&args)
        .status()
        .map_err(|err| FuzzError::Engine(format!("failed to launch {}: {err}", engine.command)))
}

/// A probe expression the engine rejected.
#[derive(Debug, Clone)]
pub struct ProbeFailure {
    pub iteration: usize,
    pub statement: String,
    pub output: String,
}

/// Evaluates `iterations` random literal-only expressions with `<engine> -e`
/// and collects the ones that exit unsuccessfully.
pub fn probe_engine<R: Rng + ?Sized>(
    engine: &EngineConfig,
    iterations: usize,
    literals: SizeRange,
    rng: &mut R,
) -> Result<Vec<ProbeFailure>, FuzzError> {
    let pool = SymbolPool::javascript();
    let mut failures = Vec::new();
    for iteration in 1..=iterations {
        let statement = probe_statement(rng, &pool, literals);
        tracing::debug!(iteration, %statement, "probing");
        let output = Command::new(&engine.command)
            .args(&engine.args)
            .arg("-e")
            .arg(&statement)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                FuzzError::Engine(format!("failed to launch {}: {err}", engine.command))
            })?;
        if output.status.success() {
            continue;
        }
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        failures.push(ProbeFailure {
            iteration,
            statement,
            output: text,
        });
    }
    Ok(failures)
}
