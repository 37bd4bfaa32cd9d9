// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use crate::models::{Expense, ExpenseCategorySummary};
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, month_label, pretty_table, progress_bar};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(tracker: &Tracker, sub: &clap::ArgMatches) -> Result<()> {
    let by_month = sub.get_one::<String>("by").map(String::as_str) == Some("month");
    let json = sub.get_flag("json");
    let jsonl = sub.get_flag("jsonl");

    if by_month {
        let items = tracker.expenses(&Default::default())?;
        let months = monthly_totals(&items);
        if maybe_print_json(json, jsonl, &months)? {
            return Ok(());
        }
        if months.is_empty() {
            println!("No spending recorded yet");
            return Ok(());
        }
        let rows = months
            .iter()
            .map(|m| vec![month_label(m.month), fmt_money(&m.total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Total"], rows));
        return Ok(());
    }

    let stats = tracker.expense_stats()?;
    if maybe_print_json(json, jsonl, &*stats)? {
        return Ok(());
    }
    if stats.is_empty() {
        println!("No spending recorded yet");
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(&["Category", "Total", "Count", "Share"], chart_rows(&stats))
    );
    let t = ChartTotals::from_stats(&stats);
    println!(
        "Total spent {} across {} categor{} in {} transaction(s)",
        fmt_money(&t.spent),
        t.categories_used,
        if t.categories_used == 1 { "y" } else { "ies" },
        t.transactions
    );
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTotals {
    pub spent: Decimal,
    /// Categories with at least one expense.
    pub categories_used: usize,
    pub transactions: u64,
}

impl ChartTotals {
    pub fn from_stats(stats: &[ExpenseCategorySummary]) -> Self {
        ChartTotals {
            spent: stats.iter().map(|s| s.total).sum(),
            categories_used: stats.iter().filter(|s| s.count > 0).count(),
            transactions: stats.iter().map(|s| s.count).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    /// First day of the month.
    pub month: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Spending per calendar month, oldest first.
pub fn monthly_totals(items: &[Expense]) -> Vec<MonthTotal> {
    let mut by_month: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for e in items {
        let Some(first) = e.date.with_day(1) else {
            continue;
        };
        *by_month.entry(first).or_default() += e.amount;
    }
    by_month
        .into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect()
}

/// One row per category, largest total first, with its share of all spending.
pub fn chart_rows(stats: &[ExpenseCategorySummary]) -> Vec<Vec<String>> {
    let grand: Decimal = stats.iter().map(|s| s.total).sum();
    let mut items: Vec<&ExpenseCategorySummary> = stats.iter().collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));
    items
        .into_iter()
        .map(|s| {
            let share = if grand.is_zero() {
                Decimal::ZERO
            } else {
                s.total / grand * Decimal::ONE_HUNDRED
            };
            vec![
                s.category.to_string(),
                fmt_money(&s.total),
                s.count.to_string(),
                format!("{} {:.1}%", progress_bar(share, 20), share),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;

    #[test]
    fn rows_sorted_by_total_with_share() {
        let stats = vec![
            ExpenseCategorySummary {
                category: ExpenseCategory::Food,
                total: Decimal::from(25),
                count: 2,
            },
            ExpenseCategorySummary {
                category: ExpenseCategory::Transport,
                total: Decimal::from(75),
                count: 1,
            },
        ];
        let rows = chart_rows(&stats);
        assert_eq!(rows[0][0], "Transport");
        assert!(rows[0][3].ends_with("75.0%"));
        assert_eq!(rows[1][1], "$25.00");
    }

    #[test]
    fn totals_skip_empty_categories() {
        let stats = vec![
            ExpenseCategorySummary {
                category: ExpenseCategory::Food,
                total: Decimal::from(40),
                count: 3,
            },
            ExpenseCategorySummary {
                category: ExpenseCategory::Other,
                total: Decimal::ZERO,
                count: 0,
            },
            ExpenseCategorySummary {
                category: ExpenseCategory::Utilities,
                total: Decimal::from(60),
                count: 1,
            },
        ];
        let t = ChartTotals::from_stats(&stats);
        assert_eq!(t.spent, Decimal::from(100));
        assert_eq!(t.categories_used, 2);
        assert_eq!(t.transactions, 4);
    }

    fn expense(day: (i32, u32, u32), amount: i64) -> Expense {
        let at = chrono::Utc::now();
        Expense {
            id: format!("{}-{}-{}", day.0, day.1, day.2),
            title: "x".into(),
            category: ExpenseCategory::Other,
            amount: Decimal::from(amount),
            date: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
            created_by: "u1".into(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn monthly_totals_sum_and_order_across_years() {
        let items = vec![
            expense((2024, 1, 20), 5),
            expense((2023, 12, 31), 7),
            expense((2024, 1, 2), 10),
            expense((2023, 2, 14), 1),
        ];
        let months = monthly_totals(&items);
        let got: Vec<(String, Decimal)> = months
            .iter()
            .map(|m| (m.month.to_string(), m.total))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2023-02-01".to_string(), Decimal::from(1)),
                ("2023-12-01".to_string(), Decimal::from(7)),
                ("2024-01-01".to_string(), Decimal::from(15)),
            ]
        );
        assert!(monthly_totals(&[]).is_empty());
    }
}
