// Xautocfg CLI
// Applies keyboard repeat settings whenever an X keyboard becomes active

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;

use xautocfg_core::{Config, ConfigLocation, Dispatcher, EventLoop, ShellHookRunner, X11Session};

/// Keyboard repeat rate daemon for X11
#[derive(Parser, Debug)]
#[command(name = "xautocfg")]
#[command(version)]
#[command(
    about = "Automatically set the X keyboard repeat rate whenever a keyboard is connected",
    long_about = None
)]
struct Args {
    /// Config file (default: $HOME/.config/xautocfg.cfg)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config, print the resolved settings and exit
    #[arg(long)]
    check_config: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn print_config(config: &Config) {
    println!("delay = {}", config.repeat_delay_ms);
    println!("interval = {}", config.repeat_interval_ms);
    println!(
        "on_enable = {}",
        config.on_enable_command.as_deref().unwrap_or("")
    );
    println!(
        "on_disable = {}",
        config.on_disable_command.as_deref().unwrap_or("")
    );
}

fn run(args: &Args) -> anyhow::Result<()> {
    let location = ConfigLocation::resolve(args.config.clone())?;
    log::debug!("config file: {}", location.path().display());

    let config = Config::load(&location)?;
    log::info!(
        "keyboard config: delay={}, interval={}",
        config.repeat_delay_ms,
        config.repeat_interval_ms
    );

    if args.check_config {
        print_config(&config);
        return Ok(());
    }

    let session = X11Session::open(None).context("X setup failed")?;
    log::debug!("XInput opcode {}", session.xinput_opcode());

    let mut dispatcher = Dispatcher::new(config, &session, ShellHookRunner::new());
    let event_loop = EventLoop::new(&session);

    match event_loop.run(&mut dispatcher) {
        Ok(never) => match never {},
        Err(e) => Err(e).context("event loop stopped"),
    }
}

/// Help and version exit 0, every other argument error exits 1
fn usage_exit(error: clap::Error) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            ExitCode::SUCCESS
        }
        _ => {
            print!("{}", error.render());
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return usage_exit(e),
    };

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
