mod config;
mod error;
mod expr;
mod harness;
mod inputs;
mod launch;
mod lines;
pub mod pool;
mod program;
mod range;
mod rng;

pub use config::{
    read_fuzz_toml, EngineConfig, FuzzConfig, GeneratorConfig, InputsConfig, LoadedConfig,
};
pub use error::FuzzError;
pub use expr::{probe_statement, synthesize_expression, Expression, ExpressionShape};
pub use harness::{
    harness_path, instrument_file, random_uuid, HarnessFile, HarnessIds, HarnessLayout,
    HarnessPositions, HarnessRecord, RenderedHarness,
};
pub use inputs::{
    discover_inputs, scan_inputs, InputDocument, InputSample, InputSpec, InputType, Sampling,
    MAX_RANDOM_INT,
};
pub use launch::{harness_arguments, probe_engine, run_harness, ProbeFailure};
pub use lines::{source_lines, SourceLines};
pub use pool::SymbolPool;
pub use program::{
    synthesize_program, ConditionalBlock, ProgramShape, SynthesizedProgram, BLOCK_LINES,
};
pub use range::SizeRange;
pub use rng::session_rng;
