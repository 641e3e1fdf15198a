// Command-line surface - one command per invocation, credentials on every call
// since sessions are not persisted between processes.

use crate::charts::category_slices;
use crate::ledger::parse_amount;
use crate::tracker::ExpenseTracker;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;

/// Record expenses against a local ledger and watch the running total
#[derive(Parser, Debug)]
#[command(name = "expense-tracker", version, long_about = None)]
pub struct Cli {
    /// Without a command the interactive terminal UI starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Ui)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the interactive terminal UI
    Ui,
    /// Register a user (passwords are stored in plaintext)
    Register { user: String, password: String },
    /// Add an expense and print the new total
    Add {
        user: String,
        password: String,
        name: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        category: Option<String>,
        /// Warn when the total goes over this limit
        #[arg(long, value_parser = parse_budget)]
        budget: Option<f64>,
    },
    /// Print the running total
    Total {
        user: String,
        password: String,
        /// Warn when the total is over this limit
        #[arg(long, value_parser = parse_budget)]
        budget: Option<f64>,
    },
    /// Amount and share per category
    Breakdown { user: String, password: String },
    /// Expenses in the order they were recorded
    Series { user: String, password: String },
    /// Write the user's expenses to a spreadsheet
    Export {
        user: String,
        password: String,
        /// Defaults to {user}_expenses.xlsx in the export directory
        path: Option<PathBuf>,
    },
}

fn parse_budget(value: &str) -> Result<f64, String> {
    parse_amount(value).map_err(|e| e.to_string())
}

/// Run one non-interactive command and return what to print
pub fn run(command: Command, tracker: &mut ExpenseTracker) -> Result<String> {
    let mut out = String::new();

    match command {
        Command::Ui => {
            writeln!(out, "{}", Cli::command().render_help())?;
        }
        Command::Register { user, password } => {
            tracker
                .register(&user, &password)
                .context("Registration failed")?;
            writeln!(out, "User registered: {}", user)?;
            writeln!(out, "Warning: passwords are stored in plaintext")?;
        }
        Command::Add {
            user,
            password,
            name,
            amount,
            category,
            budget,
        } => {
            let mut session = tracker.login(&user, &password).context("Login failed")?;
            if let Some(limit) = budget {
                tracker.set_budget(&mut session, limit)?;
            }
            let added = tracker
                .add_expense(&session, &name, &amount, category.as_deref().unwrap_or(""))
                .context("Could not add expense")?;
            writeln!(out, "Expense added")?;
            writeln!(out, "Total: {:.2}", added.total)?;
            if let Some(alert) = added.budget.alert() {
                writeln!(out, "Budget Alert: {}", alert)?;
            }
        }
        Command::Total {
            user,
            password,
            budget,
        } => {
            let mut session = tracker.login(&user, &password).context("Login failed")?;
            if let Some(limit) = budget {
                tracker.set_budget(&mut session, limit)?;
            }
            writeln!(out, "Total: {:.2}", tracker.total(&user))?;
            if let Some(alert) = tracker.budget_status(&session).alert() {
                writeln!(out, "Budget Alert: {}", alert)?;
            }
        }
        Command::Breakdown { user, password } => {
            tracker.login(&user, &password).context("Login failed")?;
            for slice in category_slices(&tracker.category_breakdown(&user)) {
                writeln!(
                    out,
                    "{:<20} {:>10.2} {:>6.1}%",
                    slice.display_name(),
                    slice.amount,
                    slice.percent
                )?;
            }
        }
        Command::Series { user, password } => {
            tracker.login(&user, &password).context("Login failed")?;
            for (name, amount) in tracker.series(&user) {
                writeln!(out, "{:<30} {:>10.2}", name, amount)?;
            }
        }
        Command::Export {
            user,
            password,
            path,
        } => {
            let session = tracker.login(&user, &password).context("Login failed")?;
            let path = match path {
                Some(path) => {
                    tracker.export_ledger(&user, &path)?;
                    path
                }
                None => tracker.export_default(&session)?,
            };
            writeln!(out, "Exported to {}", path.display())?;
        }
    }

    Ok(out)
}
