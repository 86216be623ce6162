//! Pipeline and Tomasulo simulator CLI.
//!
//! This binary assembles a source file and runs it on one of the two engines. It performs:
//! 1. **Pipeline run:** Five-stage integer pipeline, with or without forwarding.
//! 2. **Tomasulo run:** Floating-point dynamic scheduling with configurable station pools.
//!
//! Hazard, forward and status events are logged at `info`; set `RUST_LOG` to change the level.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::{fs, process};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pipesim_core::core::pipeline::{ForwardEvent, HazardEvent, PipelineObserver};
use pipesim_core::core::tomasulo::{StatusEvent, TomasuloObserver};
use pipesim_core::isa::abi;
use pipesim_core::{Config, PipelineEngine, RunMode, TomasuloEngine, assemble};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Educational CPU pipeline and Tomasulo simulator",
    long_about = "Assemble a source file and run it on the in-order pipeline or the Tomasulo engine.\n\nExamples:\n  pipesim pipeline -f fib.s --forwarding --mem 0=10\n  pipesim tomasulo -f slide.s --reg '$f2=1.5' --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by both engines.
#[derive(Args, Debug)]
struct Common {
    /// Assembly source file.
    #[arg(short, long)]
    file: String,

    /// JSON configuration file (missing fields take their defaults).
    #[arg(long)]
    config: Option<String>,

    /// Initial register value, `REG=VALUE` (e.g. `$t0=5`, `$f2=1.5`, `3=7`).
    #[arg(long = "reg", value_name = "REG=VALUE")]
    regs: Vec<String>,

    /// Initial memory value, `ADDRESS=VALUE`.
    #[arg(long = "mem", value_name = "ADDRESS=VALUE")]
    mems: Vec<String>,

    /// Stop before the instruction with this program index enters the engine.
    #[arg(long)]
    until: Option<usize>,

    /// Print final state and statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run on the five-stage in-order integer pipeline.
    Pipeline {
        #[command(flatten)]
        common: Common,

        /// Enable EX/MEM and MEM/WB forwarding.
        #[arg(long)]
        forwarding: bool,
    },

    /// Run on the Tomasulo floating-point engine.
    Tomasulo {
        #[command(flatten)]
        common: Common,

        /// Number of ADD/SUB reservation stations.
        #[arg(long = "add")]
        add_stations: Option<usize>,

        /// Number of MUL/DIV reservation stations.
        #[arg(long = "mul")]
        mul_stations: Option<usize>,

        /// Number of load/store reservation stations.
        #[arg(long = "mem-stations")]
        mem_stations: Option<usize>,
    },
}

/// Logs pipeline events.
struct LogPipeline;

impl PipelineObserver for LogPipeline {
    fn on_hazard(&mut self, event: &HazardEvent) {
        info!(cycle = event.cycle, kind = %event.kind, inst = %event.instruction, "{}", event.description);
    }

    fn on_forward(&mut self, event: &ForwardEvent) {
        info!(
            cycle = event.cycle,
            from = %event.source,
            to = %event.target,
            "forward {} = {}",
            abi::register_name(event.register).unwrap_or_default(),
            event.value
        );
    }
}

/// Logs Tomasulo status transitions.
struct LogTomasulo;

impl TomasuloObserver for LogTomasulo {
    fn on_status(&mut self, event: &StatusEvent) {
        info!(cycle = event.cycle, inst = %event.instruction, "{}", event.status);
    }
}

/// Machine-readable run summary.
#[derive(Serialize)]
struct Report<W, S> {
    cycles: u64,
    finished: bool,
    stats: S,
    registers: Vec<W>,
    memory: Vec<W>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Pipeline { common, forwarding } => cmd_pipeline(&common, forwarding),
        Commands::Tomasulo {
            common,
            add_stations,
            mul_stations,
            mem_stations,
        } => cmd_tomasulo(&common, add_stations, mul_stations, mem_stations),
    };

    if let Err(e) = result {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Loads the configuration file, or the defaults.
fn load_config(path: Option<&str>) -> CliResult<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("reading config {path}: {e}"))?;
    Ok(serde_json::from_str(&text).map_err(|e| format!("parsing config {path}: {e}"))?)
}

/// Splits a `KEY=VALUE` assignment.
fn split_assignment(arg: &str) -> CliResult<(&str, &str)> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`").into())
}

/// Parses a register token: an assembler name (`$t0`, `$f2`) or a bare index.
fn parse_register(token: &str) -> CliResult<usize> {
    abi::register_index(token)
        .or_else(|| token.parse().ok())
        .ok_or_else(|| format!("invalid register `{token}`").into())
}

/// Parses `--reg` and `--mem` assignments with the engine's cell type.
fn parse_assignments<V: std::str::FromStr>(
    common: &Common,
) -> CliResult<(Vec<(usize, V)>, Vec<(i64, V)>)> {
    let value = |v: &str| v.parse::<V>().map_err(|_| format!("invalid value `{v}`"));
    let mut regs = Vec::with_capacity(common.regs.len());
    for arg in &common.regs {
        let (r, v) = split_assignment(arg)?;
        regs.push((parse_register(r)?, value(v)?));
    }
    let mut mems = Vec::with_capacity(common.mems.len());
    for arg in &common.mems {
        let (a, v) = split_assignment(arg)?;
        let address = a.parse().map_err(|_| format!("invalid address `{a}`"))?;
        mems.push((address, value(v)?));
    }
    Ok((regs, mems))
}

const fn run_mode(until: Option<usize>) -> RunMode {
    match until {
        Some(idx) => RunMode::ToBreakpoint(idx),
        None => RunMode::ToCompletion,
    }
}

/// Prints a register dump, skipping zero cells.
fn print_cells<W: std::fmt::Display + Default + PartialEq>(title: &str, cells: &[W], reg: bool) {
    println!("{title}");
    for (i, cell) in cells.iter().enumerate() {
        if *cell == W::default() {
            continue;
        }
        let name = if reg {
            abi::register_name(i).unwrap_or_else(|| i.to_string())
        } else {
            format!("[{i}]")
        };
        println!("  {name:<8} {cell}");
    }
}

/// Runs a source file on the in-order pipeline.
fn cmd_pipeline(common: &Common, forwarding: bool) -> CliResult<()> {
    let mut config = load_config(common.config.as_deref())?;
    if forwarding {
        config.pipeline.forwarding = true;
    }
    let source = fs::read_to_string(&common.file).map_err(|e| format!("reading {}: {e}", common.file))?;
    let program = assemble(&source)?;
    let (regs, mems) = parse_assignments::<i64>(common)?;

    let mut engine = PipelineEngine::new(program, &config)?;
    for (r, v) in regs {
        engine.set_register(r, v)?;
    }
    for (a, v) in mems {
        engine.set_memory(a, v)?;
    }

    info!(file = %common.file, forwarding = config.pipeline.forwarding, "pipeline run");
    let cycles = engine.run_with(run_mode(common.until), &mut LogPipeline)?;

    if common.json {
        let report = Report {
            cycles,
            finished: engine.is_finished(),
            stats: engine.stats(),
            registers: engine.registers(),
            memory: engine.memory(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        engine.stats().print();
        print_cells("REGISTERS", &engine.registers(), true);
        print_cells("MEMORY", &engine.memory(), false);
    }
    Ok(())
}

/// Runs a source file on the Tomasulo engine.
fn cmd_tomasulo(
    common: &Common,
    add_stations: Option<usize>,
    mul_stations: Option<usize>,
    mem_stations: Option<usize>,
) -> CliResult<()> {
    let mut config = load_config(common.config.as_deref())?;
    let pools = &mut config.tomasulo;
    pools.add_stations = add_stations.unwrap_or(pools.add_stations);
    pools.mul_stations = mul_stations.unwrap_or(pools.mul_stations);
    pools.mem_stations = mem_stations.unwrap_or(pools.mem_stations);

    let source = fs::read_to_string(&common.file).map_err(|e| format!("reading {}: {e}", common.file))?;
    let program = assemble(&source)?;
    let (regs, mems) = parse_assignments::<f64>(common)?;

    let mut engine = TomasuloEngine::new(program, &config)?;
    for (r, v) in regs {
        engine.set_register(r, v)?;
    }
    for (a, v) in mems {
        engine.set_memory(a, v)?;
    }

    info!(
        file = %common.file,
        add = config.tomasulo.add_stations,
        mul = config.tomasulo.mul_stations,
        mem = config.tomasulo.mem_stations,
        "tomasulo run"
    );
    let cycles = engine.run_with(run_mode(common.until), &mut LogTomasulo)?;

    if common.json {
        let report = Report {
            cycles,
            finished: engine.is_finished(),
            stats: engine.stats(),
            registers: engine.registers(),
            memory: engine.memory(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        engine.stats().print();
        print_cells("REGISTERS", &engine.registers(), true);
        print_cells("MEMORY", &engine.memory(), false);
    }
    Ok(())
}
