use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use logshift::cli::{Cli, ColorMode};
use logshift::config::Config;
use logshift::error::LogShiftError;
use logshift::run::{RunSummary, shift_stream};
use logshift::shift::RunState;

/// Progress is redrawn every this many lines.
const PROGRESS_EVERY: u64 = 1000;

fn main() -> ExitCode {
    // Reset SIGPIPE to default behavior so upstream writers get a clean
    // SIGPIPE signal instead of a BrokenPipeError when logshift exits early.
    reset_sigpipe();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "logshift", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("logshift: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    init_tracing(config.verbose);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(LogShiftError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("logshift: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Where the shifted lines go.
enum Destination {
    Stdout,
    File(PathBuf),
}

fn resolve_destination(cli: &Cli, config: &Config, input: Option<&Path>) -> Destination {
    match (&cli.output, input) {
        (Some(path), _) if path.as_os_str() == "-" => Destination::Stdout,
        (Some(path), _) => Destination::File(path.clone()),
        (None, Some(input)) => Destination::File(config.derived_output_path(input)),
        (None, None) => Destination::Stdout,
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), LogShiftError> {
    let input = cli.input_path().map(PathBuf::as_path);
    let destination = resolve_destination(cli, config, input);
    let console = Console::new(config);

    console.banner();

    if let (Some(input), Destination::File(output)) = (input, &destination)
        && is_same_file(input, output)
    {
        return Err(LogShiftError::Config(format!(
            "output {} would overwrite the input file",
            output.display()
        )));
    }

    let mut state = RunState::new();
    let summary = match input {
        Some(path) => {
            console.status(&format!("Loading {}...", path.display()));
            let file = File::open(path).map_err(|e| {
                LogShiftError::Io(io::Error::new(e.kind(), format!("{}: {e}", path.display())))
            })?;
            write_to(&destination, BufReader::new(file), config, &mut state, &console)?
        }
        None => write_to(&destination, io::stdin().lock(), config, &mut state, &console)?,
    };

    console.finish(&summary, &destination);
    Ok(())
}

/// Whether both paths name the same existing file, through `./`, `..`,
/// symlinks or hard links.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => a == b,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn write_to<R: io::BufRead>(
    destination: &Destination,
    reader: R,
    config: &Config,
    state: &mut RunState,
    console: &Console,
) -> Result<RunSummary, LogShiftError> {
    let progress = |n: u64| console.progress(n);
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            let writer = BufWriter::new(stdout.lock());
            shift_stream(reader, writer, &config.shift, state, progress)
        }
        Destination::File(path) => {
            let file = File::create(path).map_err(|e| {
                LogShiftError::Io(io::Error::new(e.kind(), format!("{}: {e}", path.display())))
            })?;
            shift_stream(reader, BufWriter::new(file), &config.shift, state, progress)
        }
    }
}

/// Human-facing status text on stderr: banner, progress counter, summary.
struct Console {
    enabled: bool,
    use_color: bool,
    interactive: bool,
}

impl Console {
    fn new(config: &Config) -> Self {
        Self {
            enabled: !config.quiet,
            use_color: resolve_color_mode(config.color_mode),
            interactive: io::stderr().is_terminal(),
        }
    }

    fn banner(&self) {
        if !self.enabled {
            return;
        }
        let name = concat!("logshift ", env!("CARGO_PKG_VERSION"));
        if self.use_color {
            eprintln!("{}", name.bold());
        } else {
            eprintln!("{name}");
        }
        eprintln!("Rewrite date/time stamps as offsets from the previous stamp.");
        eprintln!();
    }

    fn status(&self, msg: &str) {
        if self.enabled {
            eprintln!("{msg}");
        }
    }

    fn progress(&self, line: u64) {
        if self.enabled && self.interactive && line % PROGRESS_EVERY == 0 {
            let mut stderr = io::stderr().lock();
            // Best-effort status line; a failed stderr write must not stop the run.
            let _ = write!(stderr, "Processing line: {line}\r");
            let _ = stderr.flush();
        }
    }

    fn finish(&self, summary: &RunSummary, destination: &Destination) {
        if !self.enabled {
            return;
        }
        if self.interactive {
            // clear the progress line
            eprint!("\x1b[2K");
        }
        let target = match destination {
            Destination::Stdout => "stdout".to_string(),
            Destination::File(path) => path.display().to_string(),
        };
        let msg = format!(
            "Done: {} lines, {} stamps shifted -> {target}",
            summary.lines, summary.stamps_shifted
        );
        if self.use_color {
            eprintln!("{}", msg.green());
        } else {
            eprintln!("{msg}");
        }
        if summary.non_utf8_lines > 0 {
            eprintln!(
                "{} lines held bytes that are not valid UTF-8; those bytes were copied unchanged",
                summary.non_utf8_lines
            );
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("logshift=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn resolve_color_mode(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if !io::stderr().is_terminal() {
                return false;
            }
            if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                return false;
            }
            if std::env::var("TERM").is_ok_and(|v| v == "dumb") {
                return false;
            }
            true
        }
    }
}

/// Reset SIGPIPE to the default (terminate) behavior.
///
/// By default, Rust ignores SIGPIPE to surface `BrokenPipe` I/O errors.
/// When `logshift` writes to a pipe that closes early (`logshift < a.log | head`)
/// the default action ends the process quietly instead.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}
