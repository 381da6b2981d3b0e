use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use serde::Serialize;

use crate::lines::source_lines;
use crate::FuzzError;

/// Upper bound (inclusive) for randomized integer samples.
pub const MAX_RANDOM_INT: i64 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    Boolean,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InputSample {
    Boolean(bool),
    Integer(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSpec {
    pub line_num: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: InputType,
    pub sample: InputSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Fresh values drawn from the caller's RNG.
    #[default]
    Randomized,
    /// The declared literal itself, identical on every run.
    Fixed,
}

/// Serialized shape handed to the engine-side tooling.
#[derive(Debug, Serialize)]
pub struct InputDocument<'a> {
    pub variables: &'a [InputSpec],
}

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?:this\.|(?:var|let|const)\s+)(\w+)\s*=\s*(\w+);\s*// input$")
            .expect("input declaration pattern")
    })
}

/// Classifies a declared literal. `None` means the shape is not a supported
/// input type and the declaration is skipped. Any decimal literal is an
/// `Integer`; the conventional `42` sentinel is just one of them.
fn classify(literal: &str) -> Option<(InputType, InputSample)> {
    match literal {
        "true" => Some((InputType::Boolean, InputSample::Boolean(true))),
        "false" => Some((InputType::Boolean, InputSample::Boolean(false))),
        _ if literal.bytes().all(|b| b.is_ascii_digit()) => literal
            .parse::<i64>()
            .ok()
            .map(|value| (InputType::Integer, InputSample::Integer(value))),
        _ => None,
    }
}

fn draw_sample<R: Rng + ?Sized>(ty: InputType, rng: &mut R) -> InputSample {
    match ty {
        InputType::Boolean => InputSample::Boolean(rng.gen()),
        InputType::Integer => InputSample::Integer(rng.gen_range(0..=MAX_RANDOM_INT)),
    }
}

/// Scans `source` for `... = <literal>; // input` declarations, in order.
pub fn scan_inputs<R: Rng + ?Sized>(
    source: &str,
    sampling: Sampling,
    rng: &mut R,
) -> Vec<InputSpec> {
    let pattern = declaration_pattern();
    let mut specs = Vec::new();
    for (index, line) in source_lines(source).enumerate() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };
        let name = &caps[1];
        let literal = &caps[2];
        let Some((ty, declared)) = classify(literal) else {
            tracing::debug!(
                line = index + 1,
                variable = name,
                literal,
                "skipping input of unknown type"
            );
            continue;
        };
        let sample = match sampling {
            Sampling::Randomized => draw_sample(ty, rng),
            Sampling::Fixed => declared,
        };
        specs.push(InputSpec {
            line_num: index + 1,
            name: name.to_string(),
            ty,
            sample,
        });
    }
    specs
}

pub fn discover_inputs<R: Rng + ?Sized>(
    path: &Path,
    sampling: Sampling,
    rng: &mut R,
) -> Result<Vec<InputSpec>, FuzzError> {
    let source = fs::read_to_string(path).map_err(|source| FuzzError::Source {
        path: path.to_path_buf(),
        source,
    })?;
    let specs = scan_inputs(&source, sampling, rng);
    tracing::info!(path = %path.display(), count = specs.len(), "discovered inputs");
    Ok(specs)
}
