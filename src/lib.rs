// Expense Tracker - Core Library
// Credential store, expense ledger and session facade used by the CLI and the TUI

pub mod budget;
pub mod charts;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod session;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use budget::{budget_check, BudgetStatus};
pub use charts::{category_slices, trend_points, CategorySlice, TrendPoint};
pub use cli::{Cli, Command};
pub use config::{export_file_name, AppConfig};
pub use credentials::CredentialStore;
pub use error::{AuthenticationError, TrackerError, TrackerResult, ValidationError};
pub use ledger::{parse_amount, ExpenseRecord, Ledger, COLUMNS};
pub use logging::init_logging;
pub use session::Session;
pub use store::LoadStatus;
pub use tracker::{ExpenseAdded, ExpenseTracker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
