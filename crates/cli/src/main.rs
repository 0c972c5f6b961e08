//! ACP playback harness CLI.
//!
//! This binary runs a GameTank audio coprocessor ROM against a script of timed memory
//! writes and streams the raw samples it produces. It performs:
//! 1. **Loading:** Reads the config, the 4 KiB ROM image, the script and any `--at` lines.
//! 2. **Playback:** Applies `--poke` writes, then drives a W65C02 core until the script
//!    sentinel or a run limit ends the run.
//! 3. **Output:** Writes unsigned 8-bit samples to stdout (or `--output`) one flushed byte
//!    at a time, optionally dumps RAM, and prints the run report and statistics to stderr.
//!
//! Exit codes: 0 on a normal run, 1 on usage or script errors, 2 when the ROM cannot
//! be read in full, 3 when the output stream fails.

use std::fs::{self, File};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use acpsim_core::common::HarnessError;
use acpsim_core::config::Config;
use acpsim_core::sim::loader;
use acpsim_core::sim::script::Poke;
use acpsim_core::{Driver, System, W65c02};

#[derive(Parser, Debug)]
#[command(
    name = "acpsim",
    author,
    version,
    about = "Sample-accurate playback harness for the GameTank audio coprocessor",
    long_about = "Runs a 4 KiB ACP ROM on a 65C02 core and writes every byte stored to $8000 \
                  to stdout as raw unsigned 8-bit audio at 44192 Hz.\n\n\
                  Script lines are SAMPLES:ADDR=HEXBYTES; the bytes are written when the sample \
                  count reaches SAMPLES. A line with address 0 and no bytes ends the run.\n\n\
                  Examples:\n  acpsim music.bin song.txt > out.u8\n  \
                  acpsim music.bin song.txt -o out.u8 --at 44192:0=\n  \
                  acpsim music.bin song.txt --poke 0x40=0102 --samples 441920 | aplay -f U8 -r 44192"
)]
struct Cli {
    /// ROM image; the first 4096 bytes are loaded.
    rom: PathBuf,

    /// Script of timed memory writes.
    script: PathBuf,

    /// Write samples to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump the 4 KiB RAM image here after the run.
    #[arg(short = 'O', long)]
    ram_output: Option<PathBuf>,

    /// Write bytes before the run starts (repeatable).
    #[arg(short = 'p', long = "poke", value_name = "ADDR=HEX")]
    pokes: Vec<String>,

    /// Extra script line, ahead of the file's lines at the same sample (repeatable).
    #[arg(long = "at", value_name = "SAMPLES:ADDR=HEX")]
    at: Vec<String>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many instructions.
    #[arg(short = 'I', long)]
    instructions: Option<u64>,

    /// Stop once this many cycles have run.
    #[arg(short = 'C', long)]
    cycles: Option<u64>,

    /// Stop after this many samples.
    #[arg(short = 'S', long)]
    samples: Option<u64>,

    /// Stop after this many seconds of audio.
    #[arg(short = 's', long)]
    seconds: Option<f64>,

    /// Instructions per run batch.
    #[arg(long)]
    batch_steps: Option<u32>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,

    /// Log every instruction, interrupt and sample at trace level (slow).
    #[arg(short, long)]
    trace: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose, cli.trace);

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

/// Installs the stderr subscriber; stdout carries the audio stream.
///
/// `--trace` forces the trace level over `RUST_LOG`. Colour is only used on a terminal.
fn init_logging(verbose: bool, trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        let default = if verbose { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Loads the config file, if any, and applies flag overrides.
fn load_config(cli: &Cli) -> Result<Config, HarnessError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(limit) = cli.instructions {
        config.run.max_instructions = Some(limit);
    }
    if let Some(limit) = cli.cycles {
        config.run.max_cycles = Some(limit);
    }
    if let Some(limit) = cli.samples {
        config.run.max_samples = Some(limit);
    }
    if let Some(limit) = cli.seconds {
        config.run.max_seconds = Some(limit);
    }
    if let Some(steps) = cli.batch_steps {
        config.run.batch_steps = steps;
    }
    if cli.verbose {
        config.general.log_events = true;
    }
    Ok(config)
}

/// Runs one playback and returns the process exit code.
///
/// # Arguments
///
/// * `cli` - Parsed command line.
///
/// # Returns
///
/// The report's exit code, or the first fatal error.
fn run(cli: &Cli) -> Result<i32, HarnessError> {
    let config = load_config(cli)?;
    let pokes = cli
        .pokes
        .iter()
        .map(|arg| Poke::parse(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let memory = loader::load_rom(&cli.rom)?;
    let timeline = loader::load_timeline(&cli.script, &cli.at)?;

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    let system = System::new(memory, timeline, sink).with_config(&config);
    let mut driver = Driver::new(system, config.run.clone()).with_pokes(pokes);
    let report = driver.run::<W65c02>();
    let system = driver.into_system();

    if let Some(path) = &cli.ram_output {
        fs::write(path, system.memory.as_bytes())?;
        tracing::info!("Wrote RAM image to {}", path.display());
    }

    eprintln!("{report}");
    report.stats.print();
    Ok(report.exit_code())
}
