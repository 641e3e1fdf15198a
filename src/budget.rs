// Budget check - compares a running total against the session's limit

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    /// No limit set (limit <= 0)
    Unlimited,
    Within { total: f64, limit: f64 },
    Exceeded { total: f64, limit: f64, over_by: f64 },
}

impl BudgetStatus {
    pub fn is_exceeded(&self) -> bool {
        matches!(self, BudgetStatus::Exceeded { .. })
    }

    /// Warning text for the presentation layer, only when exceeded
    pub fn alert(&self) -> Option<String> {
        match self {
            BudgetStatus::Exceeded { total, limit, over_by } => Some(format!(
                "You exceeded your budget! Total {:.2} is {:.2} over the {:.2} limit",
                total, over_by, limit
            )),
            _ => None,
        }
    }
}

/// Exceeded iff `limit > 0` and `total > limit` (strictly)
pub fn budget_check(owner: &str, total: f64, limit: f64) -> BudgetStatus {
    if limit <= 0.0 {
        return BudgetStatus::Unlimited;
    }

    if total > limit {
        let over_by = total - limit;
        warn!(user = owner, total, limit, over_by, "budget exceeded");
        BudgetStatus::Exceeded {
            total,
            limit,
            over_by,
        }
    } else {
        BudgetStatus::Within { total, limit }
    }
}
