// ExpenseTracker - the facade the presentation layers (CLI, TUI) talk to
//
// Owns the credential store and the ledger; the logged-in user travels as an
// explicit Session rather than process-wide state.

use crate::budget::{budget_check, BudgetStatus};
use crate::config::AppConfig;
use crate::credentials::CredentialStore;
use crate::error::TrackerResult;
use crate::ledger::{ExpenseRecord, Ledger};
use crate::session::Session;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a successful add: the new running total and its budget status
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseAdded {
    pub total: f64,
    pub budget: BudgetStatus,
}

#[derive(Debug)]
pub struct ExpenseTracker {
    config: AppConfig,
    credentials: CredentialStore,
    ledger: Ledger,
}

impl ExpenseTracker {
    /// Load both stores named by `config`. Never fails: unusable files start empty.
    pub fn open(config: AppConfig) -> Self {
        let credentials = CredentialStore::load(&config.users_file);
        let ledger = Ledger::load(&config.data_file);

        ExpenseTracker {
            config,
            credentials,
            ledger,
        }
    }

    pub fn login(&self, user: &str, password: &str) -> TrackerResult<Session> {
        self.credentials.authenticate(user, password)?;

        let session = Session::start(user);
        info!(user, session = %session.id, "login");
        Ok(session)
    }

    pub fn register(&mut self, user: &str, password: &str) -> TrackerResult<()> {
        self.credentials.register(user, password)
    }

    pub fn add_expense(
        &mut self,
        session: &Session,
        name: &str,
        amount_text: &str,
        category: &str,
    ) -> TrackerResult<ExpenseAdded> {
        let total = self
            .ledger
            .add_expense(&session.user, name, amount_text, category)?;

        Ok(ExpenseAdded {
            total,
            budget: budget_check(&session.user, total, session.budget_limit),
        })
    }

    pub fn set_budget(&self, session: &mut Session, amount: f64) -> TrackerResult<()> {
        session.set_budget(amount)
    }

    pub fn total(&self, user: &str) -> f64 {
        self.ledger.total_for(user)
    }

    /// The session user's total checked against the session's limit
    pub fn budget_status(&self, session: &Session) -> BudgetStatus {
        budget_check(
            &session.user,
            self.total(&session.user),
            session.budget_limit,
        )
    }

    pub fn category_breakdown(&self, user: &str) -> BTreeMap<String, f64> {
        self.ledger.category_breakdown(user)
    }

    pub fn series(&self, user: &str) -> Vec<(String, f64)> {
        self.ledger.chronological_series(user)
    }

    pub fn records(&self, user: &str) -> Vec<ExpenseRecord> {
        self.ledger.records_for(user).cloned().collect()
    }

    /// Returns the number of rows written
    pub fn export_ledger(&self, user: &str, path: &Path) -> TrackerResult<usize> {
        self.ledger.export_for(user, path)
    }

    /// Export to `{user}_expenses.xlsx` in the configured export directory
    pub fn export_default(&self, session: &Session) -> TrackerResult<PathBuf> {
        let path = self.config.export_path(&session.user);
        self.export_ledger(&session.user, &path)?;
        Ok(path)
    }

    /// Reasons any store started empty because its file was unusable
    pub fn load_warnings(&self) -> Vec<String> {
        [
            self.credentials.load_status().warning(),
            self.ledger.load_status().warning(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
