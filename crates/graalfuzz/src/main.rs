use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use graalfuzz::{
    discover_inputs, probe_engine, read_fuzz_toml, run_harness, session_rng, synthesize_program,
    EngineConfig, FuzzError, HarnessFile, InputDocument, LoadedConfig, Sampling, SizeRange,
    SymbolPool,
};
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "graalfuzz",
    version,
    about = "Synthesize and instrument JavaScript programs for engine fuzzing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Seed for every random choice (drawn from the OS when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log harness positions and other debug detail
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthesized program to the config's program_path
    Generate {
        config: PathBuf,
        /// Overwrite an existing program
        #[arg(long)]
        force: bool,
    },
    /// Wrap a program in the retry harness and print its position record
    Instrument { file: PathBuf },
    /// List `// input` declarations with sampled values
    Inputs {
        file: PathBuf,
        /// Use the declared literals instead of random samples
        #[arg(long)]
        fixed: bool,
    },
    /// Evaluate random literal expressions with `<engine> -e` and report failures
    Probe {
        iterations: usize,
        #[arg(long, default_value = "js")]
        engine: String,
        /// Literal count range
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [1, 19])]
        literals: Vec<usize>,
    },
    /// Instrument the configured program, run it in the engine, then clean up
    Run {
        config: PathBuf,
        /// Synthesize the program first
        #[arg(long)]
        generate: bool,
        /// Allow --generate to overwrite an existing program
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("GRAALFUZZ_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {err}");
    }
}

fn run(cli: Cli) -> Result<(), FuzzError> {
    match cli.command {
        Commands::Generate { config, force } => {
            let loaded = read_fuzz_toml(&config)?;
            let mut rng = rng_for(cli.seed.or(loaded.config.seed))?;
            let path = write_program(&loaded, force, &mut rng)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Instrument { file } => {
            let mut rng = rng_for(cli.seed)?;
            let record = graalfuzz::instrument_file(&file, &mut rng)?;
            print_json(&record)
        }
        Commands::Inputs { file, fixed } => {
            let mut rng = rng_for(cli.seed)?;
            let sampling = if fixed {
                Sampling::Fixed
            } else {
                Sampling::Randomized
            };
            let specs = discover_inputs(&file, sampling, &mut rng)?;
            print_json(&InputDocument { variables: &specs })
        }
        Commands::Probe {
            iterations,
            engine,
            literals,
        } => {
            let [min, max] = literals.as_slice() else {
                return Err(FuzzError::InvalidCommand(
                    "--literals takes MIN and MAX".to_string(),
                ));
            };
            let literals = SizeRange::named("literal", *min, *max)?;
            let mut rng = rng_for(cli.seed)?;
            let engine = EngineConfig {
                command: engine,
                args: Vec::new(),
            };
            let failures = probe_engine(&engine, iterations, literals, &mut rng)?;
            for failure in &failures {
                println!("### ERROR ### (iteration {})", failure.iteration);
                println!("Expression: {}", failure.statement);
                println!("Message:");
                print!("{}", failure.output);
            }
            println!("{} of {iterations} expressions failed", failures.len());
            Ok(())
        }
        Commands::Run {
            config,
            generate,
            force,
        } => {
            let loaded = read_fuzz_toml(&config)?;
            let mut rng = rng_for(cli.seed.or(loaded.config.seed))?;
            let program = if generate {
                write_program(&loaded, force, &mut rng)?
            } else {
                loaded.program_path()
            };
            if !program.is_file() {
                return Err(FuzzError::InvalidCommand(format!(
                    "file not found: {}",
                    program.display()
                )));
            }
            let harness = HarnessFile::create(&program, &mut rng)?;
            let engine = &loaded.config.engine;
            let status = run_harness(engine, harness.record(), Some(loaded.path.as_path()))?;
            if !status.success() {
                return Err(FuzzError::Engine(format!(
                    "{} exited with {status}",
                    engine.command
                )));
            }
            Ok(())
        }
    }
}

fn rng_for(seed: Option<u64>) -> Result<StdRng, FuzzError> {
    let (rng, seed) = session_rng(seed)?;
    tracing::info!(seed, "session seed");
    Ok(rng)
}

fn write_program(
    loaded: &LoadedConfig,
    force: bool,
    rng: &mut StdRng,
) -> Result<PathBuf, FuzzError> {
    let path = loaded.program_path();
    if path.exists() && !force {
        return Err(FuzzError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("refusing to overwrite {} (pass --force)", path.display()),
        )));
    }
    let shape = loaded.config.generator.program_shape();
    let program = synthesize_program(rng, &SymbolPool::javascript(), &shape);
    create_parent(&path)?;
    std::fs::write(&path, program.to_source())?;
    tracing::info!(path = %path.display(), blocks = program.blocks.len(), "wrote program");
    Ok(path)
}

fn create_parent(path: &Path) -> Result<(), FuzzError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), FuzzError> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|err| FuzzError::Io(std::io::Error::other(err)))?;
    println!("{output}");
    Ok(())
}
