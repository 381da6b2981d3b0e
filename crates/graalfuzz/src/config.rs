use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::expr::ExpressionShape;
use crate::inputs::Sampling;
use crate::program::ProgramShape;
use crate::range::SizeRange;
use crate::FuzzError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuzzConfig {
    pub program_path: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "default_blocks")]
    pub blocks: SizeRange,
    #[serde(default = "default_input_vars")]
    pub input_vars: SizeRange,
    #[serde(default = "default_const_vars")]
    pub const_vars: SizeRange,
    #[serde(default = "default_literals")]
    pub literals: SizeRange,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            blocks: default_blocks(),
            input_vars: default_input_vars(),
            const_vars: default_const_vars(),
            literals: default_literals(),
        }
    }
}

impl GeneratorConfig {
    pub fn program_shape(&self) -> ProgramShape {
        ProgramShape {
            blocks: self.blocks,
            guard: ExpressionShape {
                input_vars: self.input_vars,
                const_vars: self.const_vars,
                literals: self.literals,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    #[serde(default = "default_randomize")]
    pub randomize: bool,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            randomize: default_randomize(),
        }
    }
}

impl InputsConfig {
    pub fn sampling(&self) -> Sampling {
        if self.randomize {
            Sampling::Randomized
        } else {
            Sampling::Fixed
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_engine_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_engine_command(),
            args: Vec::new(),
        }
    }
}

const DEFAULT_BLOCKS: SizeRange = SizeRange::between(2, 4);
const DEFAULT_INPUT_VARS: SizeRange = SizeRange::exactly(1);
const DEFAULT_CONST_VARS: SizeRange = SizeRange::between(1, 2);
const DEFAULT_LITERALS: SizeRange = SizeRange::between(1, 2);

fn default_blocks() -> SizeRange {
    DEFAULT_BLOCKS
}

fn default_input_vars() -> SizeRange {
    DEFAULT_INPUT_VARS
}

fn default_const_vars() -> SizeRange {
    DEFAULT_CONST_VARS
}

fn default_literals() -> SizeRange {
    DEFAULT_LITERALS
}

fn default_randomize() -> bool {
    true
}

fn default_engine_command() -> String {
    "js".to_string()
}

impl FuzzConfig {
    pub fn parse(text: &str) -> Result<Self, FuzzError> {
        toml::from_str(text).map_err(|err| FuzzError::Config(err.to_string()))
    }

    /// `program_path`, resolved against `config_dir` when relative.
    pub fn program_path_in(&self, config_dir: &Path) -> PathBuf {
        if self.program_path.is_absolute() {
            self.program_path.clone()
        } else {
            config_dir.join(&self.program_path)
        }
    }
}

/// A parsed config together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: FuzzConfig,
}

impl LoadedConfig {
    pub fn program_path(&self) -> PathBuf {
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        self.config.program_path_in(dir)
    }
}

pub fn read_fuzz_toml(path: &Path) -> Result<LoadedConfig, FuzzError> {
    let text = std::fs::read_to_string(path).map_err(|source| FuzzError::Source {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FuzzConfig = toml::from_str(&text)
        .map_err(|err| FuzzError::Config(format!("failed to parse {}: {err}", path.display())))?;
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        config,
    })
}
