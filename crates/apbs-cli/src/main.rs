mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::config::Mode;
use crate::error::{CliError, Result, USAGE_EXIT_CODE};
use tracing::{debug, error, info, warn};

fn main() {
    let (cli, ignored) = match cli::parse_lenient(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            std::process::exit(code);
        }
    };

    if let Err(e) = run_app(cli, ignored) {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_app(cli: cli::Cli, ignored: Vec<String>) -> Result<()> {
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    for flag in &ignored {
        warn!("Ignoring unrecognized option {}.", flag);
    }

    info!("🚀 APBS client v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let app_config = config::build_config(&cli)?;

    let command_result = match &app_config.mode {
        Mode::Remote { deck } => {
            info!("Dispatching to remote submission.");
            commands::remote::run(deck, &app_config)
        }
        Mode::Status { job_id } => {
            info!("Dispatching to status check.");
            commands::status::run(job_id, &app_config)
        }
        Mode::Local { deck } => {
            info!("Dispatching to local run.");
            commands::local::run(deck, &app_config)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
