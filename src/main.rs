//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ObjgScript CLI entry point
// Objective: Command-line interface for executing .objg source files and .objgc
//            compiled artifacts, compiling sources and running a REPL
//=====================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use objgscript::devtools::repl::run_repl;
use objgscript::{
    COMPILED_EXTENSION, Interpreter, InterpreterConfig, Program, SOURCE_EXTENSION, ScriptError,
    codec, compile, parse_program, stack,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "objgscript", about = "ObjgScript CLI")]
pub struct Args {
    /// Configuration file (defaults to the per-user config.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a .objg source file or .objgc compiled artifact.
    Run(RunArgs),
    /// Compile a .objg source file into a .objgc artifact.
    Compile(CompileArgs),
    /// Start an interactive session.
    Repl(RuntimeArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Path to the script or compiled artifact to execute.
    pub script: PathBuf,

    /// Print parsed AST before execution.
    #[arg(long = "print-ast")]
    pub print_ast: bool,

    #[command(flatten)]
    pub runtime: RuntimeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RuntimeArgs {
    /// Maximum nesting of function calls.
    #[arg(long = "max-call-depth")]
    pub max_call_depth: Option<usize>,

    /// Extra directory searched by `import` (repeatable).
    #[arg(short = 'I', long = "include")]
    pub include: Vec<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompileArgs {
    /// Input .objg source file.
    pub input: PathBuf,
    /// Output artifact (defaults to the input with a .objgc extension).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

fn main() -> ExitCode {
    install_tracing();
    let args = Args::parse();

    match dispatch(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: Args) -> Result<()> {
    match args.command {
        Command::Compile(cmd) => compile_file(&cmd.input, cmd.output.as_deref()),
        Command::Run(cmd) => {
            let config = load_config(args.config.as_deref(), &cmd.runtime)?;
            run_entry(&cmd, config)
        }
        Command::Repl(runtime) => {
            let config = load_config(args.config.as_deref(), &runtime)?;
            let mut interpreter = Interpreter::with_config(config);
            let stdin = io::stdin();
            run_repl(&mut interpreter, stdin.lock(), io::stdout()).context("REPL I/O failed")
        }
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_env("OBJG_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(explicit: Option<&Path>, runtime: &RuntimeArgs) -> Result<InterpreterConfig> {
    let mut config = match explicit {
        Some(path) => InterpreterConfig::load(path)?,
        None => {
            let (config, path) = InterpreterConfig::load_default()?;
            if let Some(path) = path {
                debug!(path = %path.display(), "loaded user configuration");
            }
            config
        }
    };
    if let Some(depth) = runtime.max_call_depth {
        config.max_call_depth = depth;
    }
    config.search_paths.extend(runtime.include.iter().cloned());
    Ok(config)
}

fn run_entry(args: &RunArgs, config: InterpreterConfig) -> Result<()> {
    let mut interpreter = Interpreter::with_config(config);
    let root = interpreter.root();

    if args.print_ast {
        let program = load_program(&args.script)?;
        stack::with_stack_for_depth(codec::MAX_DOCUMENT_DEPTH, || println!("{program:#?}"));
        interpreter
            .run_program(&program, &root)
            .map_err(|err| script_failure(err.into()))?;
        return Ok(());
    }

    interpreter
        .run_file(&args.script, &root)
        .map_err(script_failure)?;
    Ok(())
}

// Parse a source file or decode a compiled artifact, chosen by extension.
fn load_program(path: &Path) -> Result<Program> {
    let is_compiled = path
        .extension()
        .is_some_and(|ext| ext == COMPILED_EXTENSION);
    if is_compiled {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return codec::deserialize(&bytes).map_err(|err| script_failure(err.into()));
    }
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_program(&source).map_err(|err| script_failure(err.into()))
}

fn compile_file(input: &Path, output: Option<&Path>) -> Result<()> {
    if !input.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
        warn!(input = %input.display(), "compiling a file without the .{SOURCE_EXTENSION} extension");
    }
    let source =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let bytes = compile(&source).map_err(script_failure)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(COMPILED_EXTENSION));
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "compiled");
    Ok(())
}

fn script_failure(err: ScriptError) -> anyhow::Error {
    anyhow!("error[{}]: {}", err.code_str(), err.message)
}
