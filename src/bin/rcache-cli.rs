//! rcache-cli
//!
//! Runs commands against a private in-process store: either one command
//! given on the command line or an interactive session reading stdin.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use rcache::{init_logging, CommandExecutor, Settings};
use tracing::debug;

#[derive(Parser)]
#[command(name = "rcache-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run rcache commands against an in-process store", long_about = None)]
struct Cli {
    /// TOML settings file (defaults to ./rcache.toml when present)
    #[arg(short, long, env = "RCACHE_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides `logging.level`
    #[arg(short, long)]
    log_level: Option<String>,
    /// One command to run, e.g. `ZADD board 10 alice`
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load().context("failed to load settings")?,
    };
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    init_logging(&settings.logging).context("failed to initialise logging")?;
    debug!(?settings, "settings loaded");

    let mut executor = CommandExecutor::from_settings(&settings);

    if !cli.args.is_empty() {
        let args: Vec<&str> = cli.args.iter().map(String::as_str).collect();
        let reply = executor.execute_str(&args)?;
        println!("{reply}");
        return Ok(());
    }

    interactive(&mut executor)
}

fn interactive(executor: &mut CommandExecutor) -> Result<()> {
    println!("rcache-cli {}", env!("CARGO_PKG_VERSION"));
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "rcache> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let args: Vec<&str> = line.split_whitespace().collect();
        match args.first().map(|s| s.to_ascii_lowercase()) {
            None => continue,
            Some(cmd) if cmd == "quit" || cmd == "exit" => break,
            Some(_) => {}
        }

        match executor.execute_str(&args) {
            Ok(reply) => println!("{reply}"),
            Err(err) => println!("(error) {err}"),
        }
    }
    Ok(())
}
