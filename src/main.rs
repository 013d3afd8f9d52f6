use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::OnceLock;
use tracing::{error, info, warn};

use sched_sim::{
    ConfigError, Sim, SimConfig, StopSignal,
    sim::{ConsoleReporter, FixedDelay, RandomWorkload},
    trace::init_tracing,
};

static STOP: OnceLock<StopSignal> = OnceLock::new();

extern "C" fn on_sigint(_: nix::libc::c_int) {
    if let Some(stop) = STOP.get() {
        stop.raise();
    }
}

fn install_sigint(stop: &StopSignal) -> nix::Result<()> {
    let _ = STOP.set(stop.clone());
    let action = SigAction::new(
        SigHandler::Handler(on_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // SAFETY: on_sigint only reads an initialized OnceLock and performs an
    // atomic store, both async-signal-safe. No other SIGINT handler is
    // installed by this process.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }.map(|_| ())
}

fn prompt_selection() -> Result<String, ConfigError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Escolha o método de escalonamento:")?;
    writeln!(stdout, "1 - FCFS")?;
    writeln!(stdout, "2 - SJF")?;
    writeln!(stdout, "3 - Round-Robin")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn main() -> ExitCode {
    init_tracing();

    let config = match SimConfig::from_env_and_args(
        std::env::args().skip(1),
        |var| std::env::var(var).ok(),
        prompt_selection,
    ) {
        Ok(config) => config,
        Err(ConfigError::InvalidSelection(raw)) => {
            warn!(selection = %raw, "invalid scheduling method");
            println!("Método inválido");
            return ExitCode::from(1);
        }
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };
    info!(?config, "configuration loaded");

    let stop = StopSignal::new();
    if let Err(e) = install_sigint(&stop) {
        warn!(error = %e, "could not install SIGINT handler; Ctrl+C will not drain");
    }

    let source = match config.seed {
        Some(seed) => RandomWorkload::seeded(seed, config.sizes.clone()),
        None => RandomWorkload::from_entropy(config.sizes.clone()),
    };
    let mut sim = Sim::new(&config.mode.policies(), config.horizon, source);
    let mut reporter = ConsoleReporter::new(io::stdout().lock());

    match sim.run(&mut reporter, &FixedDelay(config.pace), &stop) {
        Ok(stats) => {
            info!(
                cycles = stats.cycles,
                clock = stats.final_clock,
                released = stats.released,
                "simulation finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "simulation aborted");
            ExitCode::from(1)
        }
    }
}
