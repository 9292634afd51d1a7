// enigma-cli: argument handling and I/O plumbing for the `enigma` binary.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process;

use enigma_session::Session;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the configuration file when no CONFIG
/// argument is given.
pub const CONFIG_ENV: &str = "ENIGMA_CONFIG";

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub verbose: bool,
    pub config: String,
    /// Input file; stdin when `None` or `-`.
    pub input: Option<String>,
    /// Output file; stdout when `None` or `-`.
    pub output: Option<String>,
}

/// Parse `[--verbose] [CONFIG [INPUT [OUTPUT]]]`.
///
/// `env_config` is the value of [`CONFIG_ENV`]; it is used only when no
/// positional argument is given.
pub fn parse_args(args: &[String], env_config: Option<String>) -> Result<Options, String> {
    let mut verbose = false;
    let mut positional: Vec<String> = Vec::new();
    let mut only_positional = false;

    for arg in args {
        match arg.as_str() {
            _ if only_positional => positional.push(arg.clone()),
            "--" => only_positional = true,
            "--verbose" | "-v" => verbose = true,
            s if s.starts_with('-') && s != "-" => return Err(format!("unknown option {s}")),
            _ => positional.push(arg.clone()),
        }
    }
    if positional.len() > 3 {
        return Err(format!(
            "expected at most 3 arguments, got {}",
            positional.len()
        ));
    }

    let mut positional = positional.into_iter();
    let config = positional
        .next()
        .or(env_config)
        .ok_or_else(|| format!("no configuration file given (pass CONFIG or set {CONFIG_ENV})"))?;
    Ok(Options {
        verbose,
        config,
        input: positional.next(),
        output: positional.next(),
    })
}

/// Install a fmt subscriber on stderr. `RUST_LOG` takes precedence over the
/// default level, which is `trace` when `verbose` and `warn` otherwise.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "trace" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn is_std(path: &Option<String>) -> bool {
    path.as_deref().is_none_or(|p| p == "-")
}

fn open_input(path: &Option<String>) -> Result<Box<dyn BufRead>, String> {
    match path.as_deref() {
        Some(p) if p != "-" => {
            let file = File::open(p).map_err(|e| format!("could not open {p}: {e}"))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(path: &Option<String>) -> Result<Box<dyn Write>, String> {
    match path.as_deref() {
        Some(p) if p != "-" => {
            let file = File::create(p).map_err(|e| format!("could not open {p}: {e}"))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Read the configuration, then convert every line of the input.
pub fn run(opts: &Options) -> Result<(), String> {
    let config = std::fs::read_to_string(&opts.config)
        .map_err(|e| format!("could not open {}: {}", opts.config, e))?;
    let mut session = Session::from_config(&config).map_err(|e| format!("{}: {e}", opts.config))?;
    debug!(
        config = %opts.config,
        stdin = is_std(&opts.input),
        stdout = is_std(&opts.output),
        "session started"
    );

    let input = open_input(&opts.input)?;
    let output = open_output(&opts.output)?;
    session.process(input, output).map_err(|e| e.to_string())
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
