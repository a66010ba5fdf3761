//! # Profit Summary
//!
//! Derives gross income, total expenses, profit, and profit margin from
//! the aggregation output. Lives here so the server and any client
//! share one definition of the arithmetic.
//!
//! The "Profit" category is counted into `total_expenses` like every
//! other non-income category. See DESIGN.md for the open-question
//! record on that behavior.

use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryGroup;

/// Derived profit figures for a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    /// Total of the "Gross Income" group; 0 when absent.
    pub gross_income: f64,
    /// Sum of every other group's total.
    pub total_expenses: f64,
    /// `gross_income - total_expenses`.
    pub profit: f64,
    /// `profit / gross_income * 100`, or 0 when there is no income.
    pub profit_percentage: f64,
}

/// Compute the profit summary from aggregated category groups.
///
/// Deterministic and pure; safe on empty input (all zeros, no division
/// by zero).
pub fn summarize(groups: &[CategoryGroup]) -> ProfitSummary {
    let mut gross_income = 0.0;
    let mut total_expenses = 0.0;

    for group in groups {
        if group.key.category.is_income() {
            gross_income += group.total;
        } else {
            total_expenses += group.total;
        }
    }

    let profit = gross_income - total_expenses;
    let profit_percentage = if gross_income != 0.0 {
        profit / gross_income * 100.0
    } else {
        0.0
    };

    ProfitSummary {
        gross_income,
        total_expenses,
        profit,
        profit_percentage,
    }
}
