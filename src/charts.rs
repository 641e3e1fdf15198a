// Chart data - what the presentation layer draws for the category and trend charts

use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category: String,
    pub amount: f64,
    /// Share of the grand total, 0-100
    pub percent: f64,
}

impl CategorySlice {
    /// "Food 63.6%"
    pub fn label(&self) -> String {
        format!("{} {:.1}%", self.display_name(), self.percent)
    }

    /// Blank categories still need something to print
    pub fn display_name(&self) -> &str {
        if self.category.is_empty() {
            "(none)"
        } else {
            &self.category
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub index: usize,
    pub name: String,
    pub amount: f64,
}

/// Slices sorted by amount (largest first), ties by name.
/// Empty breakdown means nothing to render.
pub fn category_slices(breakdown: &BTreeMap<String, f64>) -> Vec<CategorySlice> {
    let grand_total: f64 = breakdown.values().sum();

    let mut slices: Vec<CategorySlice> = breakdown
        .iter()
        .map(|(category, amount)| CategorySlice {
            category: category.clone(),
            amount: *amount,
            percent: if grand_total != 0.0 {
                amount / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    slices.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    slices
}

pub fn trend_points(series: &[(String, f64)]) -> Vec<TrendPoint> {
    series
        .iter()
        .enumerate()
        .map(|(index, (name, amount))| TrendPoint {
            index,
            name: name.clone(),
            amount: *amount,
        })
        .collect()
}
