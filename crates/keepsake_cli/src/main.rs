//! Command-line entry point.
//!
//! # Responsibility
//! - Print the core version when run without arguments.
//! - With `<config.json> <user-id>`, open the configured store and print
//!   today's special dates and the upcoming window.

use keepsake_core::{
    bootstrap_store_registry, core_version, init_logging, EngineConfig, SpecialDateService,
    SystemClock,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            println!("keepsake_core version={}", core_version());
            ExitCode::SUCCESS
        }
        [config_path, user_id] => match run(config_path, user_id) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("event=cli_run module=cli status=error error={err}");
                eprintln!("keepsake: {err}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: keepsake [<config.json> <user-id>]");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: &str, user_id: &str) -> Result<(), Box<dyn Error>> {
    let config = EngineConfig::load(config_path)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.effective_log_level().as_str(), log_dir)?;
    }

    let registry = bootstrap_store_registry(&config)?;
    let service = SpecialDateService::new(registry.active()?, Arc::new(SystemClock));

    let today = service.today_matches(user_id)?;
    if today.is_empty() {
        println!("today: nothing special");
    }
    for record in &today {
        println!("today: {} {}", record.icon(), record.name);
    }

    for item in service.upcoming(user_id, config.upcoming_window_days)? {
        println!(
            "{} {} {} ({})",
            item.date, item.record.icon(), item.record.name, item.countdown
        );
    }
    Ok(())
}
