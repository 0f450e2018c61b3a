//! Income and expense totals over a date range

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::dates::start_of_day;
use crate::model::{Expense, Sale};
use crate::store::{EntityStore, StoreResult};

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = start_of_day(at);
        day >= start_of_day(self.start) && day <= start_of_day(self.end)
    }
}

/// Sum of sale prices with a sale date inside `period`.
pub fn total_income<S: EntityStore>(store: &S, period: Period) -> StoreResult<f64> {
    Ok(store
        .query::<Sale, _>(|s| period.contains(s.sale_date))?
        .iter()
        .map(|s| s.sale_price)
        .sum())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    /// Largest category first.
    pub by_category: Vec<CategoryTotal>,
}

pub fn total_expenses<S: EntityStore>(store: &S, period: Period) -> StoreResult<ExpenseSummary> {
    let expenses = store.query::<Expense, _>(|e| period.contains(e.expense_date))?;

    let mut per_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in &expenses {
        *per_category.entry(expense.category.as_str()).or_default() += expense.amount;
    }
    let mut by_category: Vec<CategoryTotal> = per_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

    Ok(ExpenseSummary {
        total: expenses.iter().map(|e| e.amount).sum(),
        by_category,
    })
}
