mod collectors;
mod config;
mod error;
mod extract;
mod health;
mod models;
mod normalize;
mod pipeline;
mod util;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use crossterm::tty::IsTty;
use pipeline::RunOptions;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use util::interrupt;
use util::report::{self, Painter};

#[derive(Parser, Debug)]
#[command(name = "hwcheck", about = "One-shot hardware health report: disks, memory, RAID", version)]
struct Cli {
    /// List individual memory modules
    #[arg(long)]
    detail: bool,

    /// Skip SMART queries (disks are listed from lsblk only)
    #[arg(long)]
    no_smart: bool,

    /// Skip software RAID inspection
    #[arg(long)]
    no_raid: bool,

    /// Run a write benchmark on each disk with a writable mounted filesystem
    #[arg(long)]
    benchmark: bool,

    /// Print the snapshot as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "hwcheck", &mut io::stdout());
        return Ok(());
    }
    init_logging(cli.verbose);

    if cli.config {
        return run_print_config();
    }

    interrupt::install();
    let cfg = config::Config::load();
    let opts = RunOptions {
        smart:         !cli.no_smart,
        raid:          !cli.no_raid,
        benchmark:     cli.benchmark,
        memory_detail: cli.detail || cfg.general.memory_detail,
    };

    let snapshot = pipeline::collect(&cfg, &opts);
    if snapshot.interrupted {
        eprintln!("hwcheck: interrupted");
        std::process::exit(interrupt::EXIT_INTERRUPTED);
    }

    let text = if cli.json {
        format!("{}\n", serde_json::to_string_pretty(&snapshot)?)
    } else {
        let color = !cli.no_color && cli.output.is_none() && io::stdout().is_tty();
        report::generate(&snapshot, &Painter::new(color))
    };

    match &cli.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("cannot write report to {}", path.display()))?,
        None => print!("{}", text),
    }

    std::process::exit(snapshot.exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hwcheck={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_print_config() -> Result<()> {
    let cfg = config::Config::load();
    let path = config::Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let b = &cfg.benchmark;
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  tool_timeout_sec = {}", cfg.general.tool_timeout_sec);
    println!("  memory_detail    = {}", cfg.general.memory_detail);
    println!();
    println!("[devices]");
    println!("  exclude = {:?}", cfg.devices.exclude);
    println!();
    println!("[benchmark]");
    println!("  size_mib        = {} MiB", b.size_mib);
    println!("  floor_hdd_mb_s  = {} MB/s", b.floor_hdd_mb_s);
    println!("  floor_ssd_mb_s  = {} MB/s", b.floor_ssd_mb_s);
    println!("  floor_nvme_mb_s = {} MB/s", b.floor_nvme_mb_s);
    Ok(())
}
