use clap::{Parser, ValueEnum};
use shform::diag::DiagContext;
use shform::driver::{self, CompileOptions, RuntimeMode};
use shform::json;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Parser)]
#[command(name = "shform")]
#[command(about = "Compile a JSON-encoded form tree into a POSIX shell script")]
#[command(version)]
struct Cli {
    /// JSON document to compile (reads stdin when omitted)
    #[arg()]
    input: Option<PathBuf>,

    /// Write the script to a file instead of stdout
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Start the script with #!/bin/sh
    #[arg(long)]
    shebang: bool,

    /// When to prepend the hash_set/hash_echo helpers
    #[arg(long, value_enum, default_value_t = RuntimeArg::Auto)]
    runtime: RuntimeArg,

    /// File name reported in error messages
    #[arg(long = "file")]
    file_label: Option<String>,

    /// Compile without printing the script
    #[arg(long, conflicts_with_all = ["out", "emit_tree"])]
    check: bool,

    /// Print the decoded tree instead of compiling
    #[arg(long)]
    emit_tree: bool,

    /// Do not set the executable bit on --out
    #[arg(long, requires = "out")]
    no_chmod_x: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RuntimeArg {
    Auto,
    Always,
    Never,
}

impl From<RuntimeArg> for RuntimeMode {
    fn from(arg: RuntimeArg) -> Self {
        match arg {
            RuntimeArg::Auto => RuntimeMode::Auto,
            RuntimeArg::Always => RuntimeMode::Always,
            RuntimeArg::Never => RuntimeMode::Never,
        }
    }
}

struct CliError {
    code: i32,
    msg: String,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl CliError {
    fn compile(msg: impl Into<String>) -> Self {
        Self { code: 2, msg: msg.into() }
    }

    fn io(msg: impl Into<String>) -> Self {
        Self { code: 1, msg: msg.into() }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        process::exit(e.code);
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String, CliError> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("Unable to read file: {} ({})", path.display(), e))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::io(format!("Unable to read stdin ({})", e)))?;
            Ok(buf)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let src = read_input(cli.input.as_ref())?;

    if cli.emit_tree {
        let nodes = json::parse_document(&src).map_err(|e| CliError::compile(e.to_string()))?;
        println!("{:#?}", nodes);
        return Ok(());
    }

    let label = cli
        .file_label
        .clone()
        .or_else(|| cli.input.as_ref().map(|p| p.display().to_string()));
    let options = CompileOptions {
        shebang: cli.shebang,
        runtime: cli.runtime.into(),
        diag: DiagContext {
            file: label,
            line: None,
        },
    };

    let script = driver::compile_json(&src, &options).map_err(|e| CliError::compile(e.to_string()))?;

    if cli.check {
        println!("OK");
        return Ok(());
    }

    match cli.out {
        Some(out_path) => {
            std::fs::write(&out_path, script).map_err(|e| {
                CliError::io(format!("Failed to write to {}: {}", out_path.display(), e))
            })?;

            #[cfg(unix)]
            {
                if !cli.no_chmod_x {
                    let chmod_err = |e: std::io::Error| {
                        CliError::io(format!("Failed to chmod {}: {}", out_path.display(), e))
                    };
                    let mut perms = std::fs::metadata(&out_path).map_err(chmod_err)?.permissions();
                    perms.set_mode(perms.mode() | 0o111);
                    std::fs::set_permissions(&out_path, perms).map_err(chmod_err)?;
                }
            }
        }
        None => print!("{}", script),
    }
    Ok(())
}
