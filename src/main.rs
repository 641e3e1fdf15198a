// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use expense_tracker::{cli, init_logging, AppConfig, Cli, Command, ExpenseTracker};

const DEFAULT_UI_LOG_FILE: &str = "expense-tracker.log";

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let command = Cli::parse().into_command();

    let mut config = AppConfig::from_env();
    if command == Command::Ui && config.log_file.is_none() {
        // The UI owns the terminal, so stderr is no place for log lines
        config.log_file = Some(PathBuf::from(DEFAULT_UI_LOG_FILE));
    }
    init_logging(&config);

    let mut tracker = ExpenseTracker::open(config);

    if command == Command::Ui {
        // UI mode (default)
        run_ui_mode(tracker)
    } else {
        let output = cli::run(command, &mut tracker)?;
        print!("{}", output);
        Ok(())
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(tracker: ExpenseTracker) -> Result<()> {
    let mut app = ui::App::new(tracker);
    ui::run_ui(&mut app)?;

    println!("Goodbye!");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_tracker: ExpenseTracker) -> Result<()> {
    eprintln!("TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run a command: expense-tracker --help");
    std::process::exit(1);
}
