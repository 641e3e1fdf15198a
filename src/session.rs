// Session - the logged-in user and their budget limit. Never persisted.

use crate::error::{TrackerResult, ValidationError};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub user: String,
    pub started_at: DateTime<Utc>,
    /// 0 (or negative) means no budget is enforced
    pub budget_limit: f64,
}

impl Session {
    /// Only `ExpenseTracker::login` hands these out
    pub(crate) fn start(user: &str) -> Self {
        Session {
            id: Uuid::new_v4(),
            user: user.to_string(),
            started_at: Utc::now(),
            budget_limit: 0.0,
        }
    }

    pub fn set_budget(&mut self, amount: f64) -> TrackerResult<()> {
        if !amount.is_finite() {
            return Err(ValidationError::new("budget", "Budget must be a number").into());
        }

        self.budget_limit = amount;
        info!(user = %self.user, session = %self.id, budget = amount, "budget set");
        Ok(())
    }

    pub fn has_budget(&self) -> bool {
        self.budget_limit > 0.0
    }
}
